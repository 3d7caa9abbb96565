//! Master-table column standardization.
//!
//! The master dataset reaches the forecaster through CSVs written by
//! several generations of tooling, so column spellings vary. Renaming is
//! case-insensitive and alias-aware; columns without an alias pass through
//! untouched.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;

/// (alias, canonical) pairs, matched against lower-cased column names.
const CANONICAL: [(&str, &str); 14] = [
    ("date", "DATE"),
    ("city", "CITY"),
    ("energy_generated", "ENERGY_GENERATED"),
    ("energy_efficiency_index", "EFFICIENCY_INDEX"),
    ("efficiency_index", "EFFICIENCY_INDEX"),
    ("sunshine_hours", "SUNSHINE_HOURS"),
    ("t2m", "TEMPERATURE"),
    ("temperature", "TEMPERATURE"),
    ("ws10m", "WIND_SPEED"),
    ("wind_speed", "WIND_SPEED"),
    ("allsky_sfc_sw_dwn", "SOLAR_IRRADIANCE"),
    ("solar_irradiance", "SOLAR_IRRADIANCE"),
    ("rh2m", "HUMIDITY"),
    ("predicted_energy", "PREDICTED_ENERGY"),
];

/// Rename known columns to their canonical names in place.
pub fn standardize_columns(df: &mut DataFrame) -> Result<()> {
    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for name in names {
        let lower = name.to_lowercase();
        if let Some((_, canonical)) = CANONICAL.iter().find(|(alias, _)| *alias == lower) {
            if name != *canonical {
                df.rename(&name, canonical)
                    .with_context(|| format!("renaming column '{name}'"))?;
            }
        }
    }
    Ok(())
}

/// One fully-valued historical row, target and covariates extracted.
#[derive(Debug, Clone)]
pub struct MasterRow {
    pub date: NaiveDate,
    pub city: String,
    pub target: f64,
    /// Aligned with the covariate name list passed to [`extract_rows`].
    pub covariates: Vec<f64>,
}

/// Pull typed rows out of a standardized master frame, sorted by
/// (city, date). Rows with an unparseable date or any null among the target
/// and covariates are dropped, mirroring the lag stage's requirement for
/// fully-valued inputs.
pub fn extract_rows(df: &DataFrame, target: &str, covariates: &[String]) -> Result<Vec<MasterRow>> {
    let dates = df
        .column("DATE")
        .context("master table is missing a DATE column")?
        .utf8()
        .context("DATE column must be a string column")?;
    let cities = df
        .column("CITY")
        .context("master table is missing a CITY column")?
        .utf8()
        .context("CITY column must be a string column")?;

    let target_series = df
        .column(target)
        .with_context(|| format!("master table is missing target column '{target}'"))?
        .cast(&DataType::Float64)?;
    let target_values = target_series.f64()?;

    let mut covariate_values = Vec::with_capacity(covariates.len());
    for name in covariates {
        let available = df.get_column_names().join(", ");
        let series = df
            .column(name)
            .with_context(|| {
                format!("feature column '{name}' not found; available columns: {available}")
            })?
            .cast(&DataType::Float64)?;
        covariate_values.push(series);
    }
    let covariate_chunks: Vec<_> = covariate_values
        .iter()
        .map(|s| s.f64())
        .collect::<PolarsResult<_>>()?;

    let mut rows = Vec::with_capacity(df.height());
    'row: for i in 0..df.height() {
        let (Some(date_str), Some(city), Some(target)) =
            (dates.get(i), cities.get(i), target_values.get(i))
        else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
            continue;
        };
        let mut row_covariates = Vec::with_capacity(covariate_chunks.len());
        for chunk in &covariate_chunks {
            match chunk.get(i) {
                Some(value) => row_covariates.push(value),
                None => continue 'row,
            }
        }
        rows.push(MasterRow {
            date,
            city: city.to_string(),
            target,
            covariates: row_covariates,
        });
    }

    if rows.is_empty() {
        bail!("no fully-valued rows found for target '{target}'");
    }
    rows.sort_by(|a, b| a.city.cmp(&b.city).then(a.date.cmp(&b.date)));
    Ok(rows)
}
