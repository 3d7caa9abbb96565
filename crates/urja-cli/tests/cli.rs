use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SOLAR: &str = "\
NASA/POWER CERES/MERRA2 Native Resolution Monthly and Annual
Location: Regional
PARAMETER,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,ANN
ALLSKY_SFC_SW_DWN,2020,5.1,5.6,6.2,6.6,6.4,4.9,4.0,3.9,4.6,5.2,5.0,4.8,5.2
T2M,2020,24.0,26.1,29.4,32.0,33.2,29.8,27.3,26.9,27.8,28.0,26.2,24.4,27.9
RH2M,2020,45,42,38,35,40,62,75,78,70,55,50,47,53
";

const WIND: &str = "\
PARAMETER,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,ANN
WS10M,2020,2.1,2.3,2.5,2.9,3.4,3.8,3.6,3.2,2.7,2.2,2.0,1.9,2.7
";

fn seed_raw_dir(data: &Path) {
    fs::create_dir_all(data).unwrap();
    fs::write(data.join("Pune_solar.csv"), SOLAR).unwrap();
    fs::write(data.join("Pune_wind.csv"), WIND).unwrap();
}

fn write_config(dir: &Path, data: &Path, out: &Path) -> std::path::PathBuf {
    let config = dir.join("pipeline.yaml");
    fs::write(
        &config,
        format!(
            "input_dir: {}\noutput_dir: {}\ncities: [Pune]\n",
            data.display(),
            out.display()
        ),
    )
    .unwrap();
    config
}

#[test]
fn convert_reshapes_raw_directory() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    seed_raw_dir(&data);
    // A file with no detectable header is skipped, not fatal.
    fs::write(data.join("notes.csv"), "free text, no matrix here\n").unwrap();

    let config = write_config(tmp.path(), &data, &tmp.path().join("out"));
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args(["--config", config.to_str().unwrap(), "convert"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 2 file(s), skipped 1"));

    assert!(data.join("Pune_solar_clean.csv").exists());
    assert!(data.join("Pune_wind_clean.csv").exists());
    let clean = fs::read_to_string(data.join("Pune_solar_clean.csv")).unwrap();
    assert!(clean.starts_with("DATE,PARAM,VALUE"));
    assert!(clean.contains("2020-01-01,ALLSKY_SFC_SW_DWN,5.1"));
}

#[test]
fn convert_single_file_to_explicit_out_dir() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    seed_raw_dir(&data);
    let out = tmp.path().join("cleaned");

    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args([
        "convert",
        "--input",
        data.join("Pune_wind.csv").to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ])
    .assert()
    .success();
    assert!(out.join("Pune_wind_clean.csv").exists());
}

#[test]
fn merge_builds_master_dataset() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    seed_raw_dir(&data);
    let mut pop = String::from("City,Year,Population,Density,Growth\n");
    pop.push_str("Pune,2020,7500000,11000,2.1\n");
    fs::write(data.join("final_population_2015_2024.csv"), pop).unwrap();

    let out = tmp.path().join("out");
    let config = write_config(tmp.path(), &data, &out);
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args(["--config", config.to_str().unwrap(), "merge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Master dataset: 12 rows"));

    let master = fs::read_to_string(out.join("MASTER_DATASET.csv")).unwrap();
    assert!(master.starts_with("DATE,CITY,YEAR,MONTH"));
    assert!(master.contains("Wind_Power_Density"));
    assert!(master.contains("Population"));
}

#[test]
fn merge_fails_cleanly_without_input_dir() {
    let tmp = tempdir().unwrap();
    let config = write_config(
        tmp.path(),
        &tmp.path().join("missing"),
        &tmp.path().join("out"),
    );
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args(["--config", config.to_str().unwrap(), "merge"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("input directory"));
}

#[test]
fn features_writes_combined_table() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    seed_raw_dir(&data);
    let out = tmp.path().join("out");

    let config = write_config(tmp.path(), &data, &out);
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args(["--config", config.to_str().unwrap(), "features"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feature table: 12 rows"));

    assert!(out.join("CITY_FEATURES.csv").exists());
    assert!(out.join("features").join("Pune_features.csv").exists());
}

#[test]
fn forecast_then_dashboard_round_trip() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("out");
    fs::create_dir_all(&out).unwrap();

    // A hand-built master long enough for lag-12 features.
    let mut master = String::from(
        "DATE,CITY,ENERGY_GENERATED,EFFICIENCY_INDEX,SUNSHINE_HOURS,SOLAR_IRRADIANCE,TEMPERATURE,WIND_SPEED,HUMIDITY\n",
    );
    for i in 0..48 {
        let year = 2016 + i / 12;
        let month = i % 12 + 1;
        let energy = 100.0 + i as f64;
        master.push_str(&format!(
            "{year}-{month:02}-01,Pune,{energy},0.8,250,5.2,27.5,2.4,60\n"
        ));
    }
    let master_path = out.join("MASTER_DATASET.csv");
    fs::write(&master_path, &master).unwrap();

    let config = write_config(tmp.path(), &tmp.path().join("data"), &out);
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "forecast",
        "--horizon",
        "1",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Forecast: 48 historical"));

    let combined = fs::read_to_string(out.join("FORECAST_DATASET.csv")).unwrap();
    assert!(combined.contains("DATA_TYPE"));
    assert!(combined.contains("Forecast"));

    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "dashboard",
        "--city",
        "Pune",
        "--objective",
        "4",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Forecast Reliability"));
}

fn multi_year_matrix(params: &[&str]) -> String {
    let mut csv = String::from(
        "PARAMETER,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,ANN\n",
    );
    for param in params {
        for year in 2018..=2021 {
            csv.push_str(&format!("{param},{year}"));
            for month in 1..=12 {
                csv.push_str(&format!(",{}.0", (year - 2018) * 12 + month));
            }
            csv.push_str(",0.0\n");
        }
    }
    csv
}

#[test]
fn merged_master_feeds_the_forecaster() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("Pune_solar.csv"),
        multi_year_matrix(&["ALLSKY_SFC_SW_DWN", "T2M", "RH2M"]),
    )
    .unwrap();
    fs::write(data.join("Pune_wind.csv"), multi_year_matrix(&["WS10M"])).unwrap();
    let mut energy = String::from("City,State,Year,GWh,PerCap,Peak\n");
    for year in 2018..=2021 {
        energy.push_str(&format!("Pune,MH,{year},{}.0,800,60\n", 100 + year - 2018));
    }
    fs::write(data.join("city_energy_2015_2024.csv"), energy).unwrap();

    let out = tmp.path().join("out");
    let config = write_config(tmp.path(), &data, &out);
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args(["--config", config.to_str().unwrap(), "merge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Master dataset: 48 rows"));

    // The merged master carries no generation or efficiency columns;
    // absent default covariates are dropped instead of failing the run.
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "forecast",
        "--target",
        "Energy_Consumption_GWh",
        "--horizon",
        "1",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Forecast: 48 historical"));

    let combined = fs::read_to_string(out.join("FORECAST_DATASET.csv")).unwrap();
    assert!(combined.contains("Energy_Consumption_GWh"));
    assert!(combined.contains("Forecast"));
}

#[test]
fn forecast_accepts_custom_covariates() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let mut master = String::from("DATE,CITY,ENERGY_GENERATED,TEMPERATURE\n");
    for i in 0..36 {
        let year = 2017 + i / 12;
        let month = i % 12 + 1;
        master.push_str(&format!("{year}-{month:02}-01,Pune,{}.0,27.5\n", 100 + i));
    }
    fs::write(out.join("MASTER_DATASET.csv"), master).unwrap();

    let config = write_config(tmp.path(), &tmp.path().join("data"), &out);
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "forecast",
        "--covariates",
        "TEMPERATURE",
        "--horizon",
        "1",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Forecast: 36 historical"));
}

#[test]
fn dashboard_renders_generation_view() {
    let tmp = tempdir().unwrap();
    let out = tmp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(
        out.join("MASTER_DATASET.csv"),
        "DATE,CITY,ENERGY_GENERATED,EFFICIENCY_INDEX\n\
         2020-01-01,Pune,100.0,0.8\n\
         2020-02-01,Pune,121.0,0.9\n",
    )
    .unwrap();

    let config = write_config(tmp.path(), &tmp.path().join("data"), &out);
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args([
        "--config",
        config.to_str().unwrap(),
        "dashboard",
        "--city",
        "Pune",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Energy Generation Performance"))
    .stdout(predicate::str::contains("21.0% change"));
}

#[test]
fn inspect_prints_leading_rows() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("raw.csv");
    fs::write(&file, SOLAR).unwrap();

    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args(["inspect", file.to_str().unwrap(), "--rows", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NASA/POWER"))
        .stdout(predicate::str::contains("Location"))
        .stdout(predicate::str::contains("PARAMETER").not());
}

#[test]
fn completions_generate_for_bash() {
    let mut cmd = Command::cargo_bin("urja").unwrap();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("urja"));
}
