//! End-to-end forecast run: master CSV in, combined forecast CSV out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};
use urja_core::distinct_cities;
use urja_io::{read_csv_frame, write_csv_frame};

use crate::combine::combined_frame;
use crate::lags::build_lag_rows;
use crate::model::{train, EvalMetrics};
use crate::recursive::forecast_all;
use crate::standardize::{extract_rows, standardize_columns};
use crate::ForecastOptions;

#[derive(Debug)]
pub struct ForecastSummary {
    pub metrics: EvalMetrics,
    pub historical_rows: usize,
    pub forecast_rows: usize,
    pub cities_forecast: usize,
    pub cities_skipped: Vec<String>,
    pub path: PathBuf,
}

/// Train, evaluate, recursively forecast, and write the combined dataset.
pub fn run_forecast(
    master_path: &Path,
    output_path: &Path,
    options: &ForecastOptions,
) -> Result<ForecastSummary> {
    let mut master = read_csv_frame(master_path).context("loading master dataset")?;
    standardize_columns(&mut master)?;

    // Master tables differ in which covariates they carry; absent columns
    // are dropped from the feature set rather than failing the run.
    let covariates: Vec<String> = options
        .covariates
        .iter()
        .filter(|name| {
            let present = master.column(name.as_str()).is_ok();
            if !present {
                warn!(column = name.as_str(), "covariate absent from master, dropped");
            }
            present
        })
        .cloned()
        .collect();

    let rows = extract_rows(&master, &options.target, &covariates)?;
    let cities = distinct_cities(rows.iter().map(|r| r.city.as_str()));
    let lag_rows = build_lag_rows(&rows, &cities, &options.lag_depths);

    // Cities present in the history but too short to produce a single
    // lag-complete row cannot seed the recursion.
    let cities_skipped: Vec<String> = cities
        .iter()
        .filter(|city| !lag_rows.iter().any(|r| &r.city == *city))
        .cloned()
        .collect();
    for city in &cities_skipped {
        warn!(city = city.as_str(), "history shorter than lag depth, excluded");
    }

    let model = train(&lag_rows, options)?;
    let forecast = forecast_all(&model, &lag_rows, options.horizon_years)?;

    let mut combined = combined_frame(&rows, &forecast, &options.target)?;
    write_csv_frame(&mut combined, output_path).context("writing forecast dataset")?;
    info!(
        historical = rows.len(),
        forecast = forecast.len(),
        path = %output_path.display(),
        "forecast dataset written"
    );

    Ok(ForecastSummary {
        metrics: model.metrics,
        historical_rows: rows.len(),
        forecast_rows: forecast.len(),
        cities_forecast: cities.len() - cities_skipped.len(),
        cities_skipped,
        path: output_path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::fs;
    use tempfile::tempdir;
    use urja_io::read_csv_frame;

    fn synthetic_master(months: usize) -> String {
        let mut csv = String::from(
            "DATE,CITY,ENERGY_GENERATED,EFFICIENCY_INDEX,SUNSHINE_HOURS,SOLAR_IRRADIANCE,TEMPERATURE,WIND_SPEED,HUMIDITY\n",
        );
        for city in ["Delhi", "Pune"] {
            for i in 0..months {
                let year = 2015 + i / 12;
                let month = i % 12 + 1;
                let energy = 100.0 + i as f64 + if city == "Pune" { 25.0 } else { 0.0 };
                writeln!(
                    csv,
                    "{year}-{month:02}-01,{city},{energy},0.8,250,5.2,27.5,2.4,60"
                )
                .unwrap();
            }
        }
        csv
    }

    #[test]
    fn full_run_produces_combined_dataset() {
        let dir = tempdir().unwrap();
        let master = dir.path().join("master.csv");
        fs::write(&master, synthetic_master(48)).unwrap();
        let out = dir.path().join("forecast.csv");

        let options = ForecastOptions {
            trees: 10,
            max_depth: 5,
            horizon_years: 2,
            ..ForecastOptions::default()
        };
        let summary = run_forecast(&master, &out, &options).unwrap();

        assert_eq!(summary.historical_rows, 96);
        assert_eq!(summary.cities_forecast, 2);
        assert!(summary.cities_skipped.is_empty());
        // History ends 2018-12; horizon 2 years -> 24 months per city.
        assert_eq!(summary.forecast_rows, 48);

        let combined = read_csv_frame(&out).unwrap();
        assert_eq!(combined.height(), 96 + 48);
        let flags = combined.column("DATA_TYPE").unwrap().utf8().unwrap();
        let forecast_count = flags.into_iter().filter(|f| *f == Some("Forecast")).count();
        assert_eq!(forecast_count, 48);
    }

    #[test]
    fn absent_covariates_are_dropped_not_fatal() {
        let dir = tempdir().unwrap();
        let master = dir.path().join("master.csv");
        // A merge-style master: raw parameter spellings, no generation or
        // efficiency columns at all.
        let mut csv = String::from("DATE,CITY,Energy_Consumption_GWh,T2M,WS10M\n");
        for i in 0..30 {
            let year = 2018 + i / 12;
            let month = i % 12 + 1;
            writeln!(
                csv,
                "{year}-{month:02}-01,Delhi,{},27.5,2.4",
                300.0 + i as f64
            )
            .unwrap();
        }
        fs::write(&master, csv).unwrap();
        let out = dir.path().join("forecast.csv");

        let options = ForecastOptions {
            target: "Energy_Consumption_GWh".to_string(),
            trees: 10,
            max_depth: 5,
            horizon_years: 1,
            ..ForecastOptions::default()
        };
        let summary = run_forecast(&master, &out, &options).unwrap();
        assert_eq!(summary.cities_forecast, 1);
        assert!(summary.forecast_rows > 0);
    }

    #[test]
    fn short_city_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let master = dir.path().join("master.csv");
        let mut csv = synthetic_master(36);
        // Kochi has only five months, shorter than lag-12.
        for month in 1..=5 {
            csv.push_str(&format!("2018-0{month}-01,Kochi,90.0,0.7,240,5.0,28.0,2.0,70\n"));
        }
        fs::write(&master, csv).unwrap();
        let out = dir.path().join("forecast.csv");

        let options = ForecastOptions {
            trees: 10,
            max_depth: 5,
            horizon_years: 1,
            ..ForecastOptions::default()
        };
        let summary = run_forecast(&master, &out, &options).unwrap();
        assert_eq!(summary.cities_skipped, vec!["Kochi".to_string()]);
        assert_eq!(summary.cities_forecast, 2);
    }
}
