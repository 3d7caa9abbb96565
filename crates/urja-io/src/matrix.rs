//! Raw climate matrix reshaper.
//!
//! The weather provider exports one file per (city, category) with a block
//! of free-text metadata followed by a wide matrix: one row per
//! (parameter, year), one column per calendar month plus an annual summary.
//! This module locates the matrix header, melts the month columns into long
//! (date, parameter, value) observations, and writes the cleaned result.
//!
//! Tolerance policy: these exports are heterogeneous, so a file whose header
//! cannot be located is skipped with a diagnostic rather than failing the
//! run, and rows whose year field is non-numeric (footer noise) are dropped
//! silently.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use urja_core::{month_start, LongObservation, MONTHS};

/// Declared schema of the wide matrix: parameter, year, twelve months, and
/// an annual summary that the melt excludes. Columns beyond these are
/// ignored.
const MATRIX_COLUMNS: usize = 2 + 12 + 1;

/// Reshape one raw matrix file into long observations sorted by date.
///
/// Returns `Ok(None)` when no matrix header could be located in the file.
pub fn reshape_matrix(path: &Path) -> Result<Option<Vec<LongObservation>>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading raw matrix '{}'", path.display()))?;

    let Some(header_idx) = find_header_line(&contents) else {
        return Ok(None);
    };

    let mut observations = Vec::new();
    for line in contents.lines().skip(header_idx + 1) {
        let fields = split_fields(line);
        if fields.len() < 2 {
            continue;
        }
        // Non-numeric years mark metadata/footer rows, not errors.
        let Ok(year) = fields[1].parse::<i32>() else {
            continue;
        };
        let param = fields[0].to_string();
        let month_fields = &fields[2..fields.len().min(MATRIX_COLUMNS - 1)];
        for (offset, raw_value) in month_fields.iter().enumerate().take(MONTHS.len()) {
            let Ok(value) = raw_value.parse::<f64>() else {
                continue;
            };
            let month = offset as u32 + 1;
            let Some(date) = month_start(year, month) else {
                continue;
            };
            observations.push(LongObservation {
                date,
                param: param.clone(),
                value,
            });
        }
    }

    observations.sort_by_key(|obs| obs.date);
    Ok(Some(observations))
}

/// Scan the file for the matrix header row. The marker is a line starting
/// with PARAM that also names YEAR and JAN, case-insensitive; the exports
/// vary in how much metadata precedes it, so the whole file is scanned and
/// the first match wins.
fn find_header_line(contents: &str) -> Option<usize> {
    contents.lines().position(|line| {
        let cleaned = line.trim().to_ascii_uppercase();
        cleaned.starts_with("PARAM") && cleaned.contains("YEAR") && cleaned.contains("JAN")
    })
}

/// Matrix rows come both comma- and whitespace-separated depending on the
/// export vintage. Comma rows keep empty cells so the month columns stay
/// positionally aligned Jan..Dec; an empty cell simply yields no
/// observation for that month.
fn split_fields(line: &str) -> Vec<&str> {
    if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Write long observations as a DATE,PARAM,VALUE CSV.
pub fn write_long_csv(observations: &[LongObservation], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating cleaned CSV {}", path.display()))?;
    writer.write_record(["DATE", "PARAM", "VALUE"])?;
    for obs in observations {
        writer.write_record([
            obs.date.to_string(),
            obs.param.clone(),
            obs.value.to_string(),
        ])?;
    }
    writer.flush().context("flushing cleaned CSV")?;
    Ok(())
}

/// Outcome of a folder or single-file conversion run.
#[derive(Debug, Default)]
pub struct ConvertSummary {
    pub converted: usize,
    pub skipped: usize,
}

/// Convert one raw file to `{stem}_clean.csv` in the output folder.
///
/// Returns false when the file was skipped (already cleaned, or no header).
pub fn convert_file(input: &Path, output_dir: &Path) -> Result<bool> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("raw path '{}' has no usable file name", input.display()))?;
    if name.to_ascii_lowercase().ends_with("_clean.csv") {
        warn!(file = name, "file already cleaned, skipping");
        return Ok(false);
    }

    match reshape_matrix(input)? {
        Some(observations) => {
            let out_name = name.replacen(".csv", "_clean.csv", 1);
            let out_path = output_dir.join(out_name);
            write_long_csv(&observations, &out_path)?;
            info!(file = name, rows = observations.len(), "converted");
            Ok(true)
        }
        None => {
            warn!(file = name, "matrix header not found, skipping");
            Ok(false)
        }
    }
}

/// Convert a single file or every `*.csv` in a directory.
pub fn convert_path(input: &Path, output_dir: &Path) -> Result<ConvertSummary> {
    let mut summary = ConvertSummary::default();
    if input.is_file() {
        if convert_file(input, output_dir)? {
            summary.converted += 1;
        } else {
            summary.skipped += 1;
        }
        return Ok(summary);
    }

    if !input.is_dir() {
        bail!(
            "input path '{}' is neither a file nor a directory",
            input.display()
        );
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(input)
        .with_context(|| format!("listing raw directory '{}'", input.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    entries.sort();

    for path in entries {
        if convert_file(&path, output_dir)? {
            summary.converted += 1;
        } else {
            summary.skipped += 1;
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
-BEGIN HEADER-
NASA/POWER CERES/MERRA2 Native Resolution Monthly and Annual
Location: latitude 18.52 longitude 73.85
-END HEADER-
PARAMETER,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,ANN
ALLSKY_SFC_SW_DWN,2020,5.1,5.6,6.2,6.6,6.4,4.9,4.0,3.9,4.6,5.2,5.0,4.8,5.2
ALLSKY_SFC_SW_DWN,2021,5.0,5.7,6.3,6.5,6.2,4.7,4.1,4.0,4.7,5.1,4.9,4.7,5.2
WS10M,2020,2.1,2.3,2.5,2.9,3.4,3.8,3.6,3.2,2.7,2.2,2.0,1.9,2.7
footer text not a data row
";

    #[test]
    fn melts_every_month_and_drops_annual() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("Pune_solar.csv");
        fs::write(&raw, SAMPLE).unwrap();

        let obs = reshape_matrix(&raw).unwrap().unwrap();
        // 2 params-year rows of ALLSKY + 1 of WS10M, 12 months each.
        assert_eq!(obs.len(), 3 * 12);
        assert!(obs.iter().all(|o| o.date.to_string().ends_with("-01")));
        // Sorted ascending by date.
        assert!(obs.windows(2).all(|w| w[0].date <= w[1].date));
        // ANN column excluded: no value 5.2 paired with a 13th month.
        let jan_2020: Vec<_> = obs
            .iter()
            .filter(|o| o.date.to_string() == "2020-01-01")
            .collect();
        assert_eq!(jan_2020.len(), 2);
    }

    #[test]
    fn missing_header_yields_none() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("garbage.csv");
        fs::write(&raw, "just,some,random\nlines,of,noise\n").unwrap();
        assert!(reshape_matrix(&raw).unwrap().is_none());
    }

    #[test]
    fn non_numeric_year_rows_are_dropped() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("Pune_wind.csv");
        fs::write(&raw, SAMPLE).unwrap();
        let obs = reshape_matrix(&raw).unwrap().unwrap();
        assert!(obs.iter().all(|o| {
            let year = o.date.to_string();
            year.starts_with("2020") || year.starts_with("2021")
        }));
    }

    #[test]
    fn folder_mode_skips_cleaned_and_headerless_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("data");
        let output = dir.path().join("cleaned");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("Pune_solar.csv"), SAMPLE).unwrap();
        fs::write(input.join("Pune_solar_clean.csv"), "DATE,PARAM,VALUE\n").unwrap();
        fs::write(input.join("notes.csv"), "no header here\n").unwrap();

        let summary = convert_path(&input, &output).unwrap();
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped, 2);
        assert!(output.join("Pune_solar_clean.csv").exists());
    }

    #[test]
    fn empty_cell_keeps_months_aligned() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("gap.csv");
        let sample = "\
PARAMETER,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,ANN
T2M,2020,1.0,,3.0,4.0,5.0,6.0,7.0,8.0,9.0,10.0,11.0,12.0,99.0
";
        fs::write(&raw, sample).unwrap();
        let obs = reshape_matrix(&raw).unwrap().unwrap();
        // February produces no observation; the rest keep their months.
        assert_eq!(obs.len(), 11);
        assert!(!obs.iter().any(|o| o.date.to_string() == "2020-02-01"));
        let march = obs
            .iter()
            .find(|o| o.date.to_string() == "2020-03-01")
            .unwrap();
        assert_eq!(march.value, 3.0);
        let december = obs
            .iter()
            .find(|o| o.date.to_string() == "2020-12-01")
            .unwrap();
        // The annual summary never leaks into December.
        assert_eq!(december.value, 12.0);
    }

    #[test]
    fn whitespace_separated_matrix_parses_too() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("ws.csv");
        let sample = "\
PARAMETER YEAR JAN FEB MAR APR MAY JUN JUL AUG SEP OCT NOV DEC ANN
T2M 2019 24.0 26.1 29.4 32.0 33.2 29.8 27.3 26.9 27.8 28.0 26.2 24.4 27.9
";
        fs::write(&raw, sample).unwrap();
        let obs = reshape_matrix(&raw).unwrap().unwrap();
        assert_eq!(obs.len(), 12);
        assert_eq!(obs[0].param, "T2M");
    }
}
