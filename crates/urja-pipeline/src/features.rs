//! City file aggregation.
//!
//! Discovers `{city}_{category}.csv` raw matrices for each configured city,
//! reshapes them, and pivots parameter values into named columns indexed by
//! date. A missing file costs that city its columns but never aborts the
//! run; a category with zero loaded files across every city is fatal because
//! there is nothing left to merge.
//!
//! The pivot is built by hand on a BTreeMap keyed by date. Parameter/date
//! combinations absent from the input stay null in the output.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::{info, warn};
use urja_core::PipelineConfig;
use urja_io::{reshape_matrix, write_csv_frame};

/// Solar-category parameters carried into the feature table.
pub const SOLAR_PARAMS: [&str; 9] = [
    "ALLSKY_SFC_SW_DWN",
    "ALLSKY_SFC_SW_DNI",
    "ALLSKY_SFC_SW_DIFF",
    "T2M",
    "T2M_MAX",
    "T2M_MIN",
    "RH2M",
    "CLD_FRAC",
    "PS",
];

/// Wind-category parameters carried into the feature table.
pub const WIND_PARAMS: [&str; 3] = ["WS2M", "WS10M", "WD10M"];

fn recognized(category: &str, param: &str) -> bool {
    match category {
        "solar" => SOLAR_PARAMS.contains(&param),
        "wind" => WIND_PARAMS.contains(&param),
        // Unknown categories carry everything through.
        _ => true,
    }
}

type CityPivot = BTreeMap<NaiveDate, BTreeMap<String, f64>>;

/// Aggregate every configured city into one feature table.
///
/// Columns: DATE, CITY, YEAR, MONTH, then the union of parameters observed
/// across all cities. When `persist` is set, each city's slice is also
/// written to `<output_dir>/features/{city}_features.csv` before
/// concatenation so later runs can skip the reshape.
pub fn aggregate_cities(config: &PipelineConfig, persist: bool) -> Result<DataFrame> {
    let mut pivots: Vec<(String, CityPivot)> = Vec::new();
    let mut loaded_per_category: BTreeMap<&str, usize> = config
        .categories
        .iter()
        .map(|c| (c.as_str(), 0usize))
        .collect();

    for city in &config.cities {
        let mut pivot = CityPivot::new();
        for category in &config.categories {
            let path = config.raw_path(city, category);
            if !path.exists() {
                warn!(city = city.as_str(), category = category.as_str(), "missing raw file");
                continue;
            }
            let Some(observations) = reshape_matrix(&path)? else {
                warn!(
                    city = city.as_str(),
                    category = category.as_str(),
                    "header not found, file skipped"
                );
                continue;
            };
            for obs in observations {
                if !recognized(category, &obs.param) {
                    continue;
                }
                pivot.entry(obs.date).or_default().insert(obs.param, obs.value);
            }
            *loaded_per_category.entry(category.as_str()).or_default() += 1;
            info!(city = city.as_str(), category = category.as_str(), "loaded");
        }
        if !pivot.is_empty() {
            pivots.push((city.clone(), pivot));
        }
    }

    for (category, loaded) in &loaded_per_category {
        if *loaded == 0 {
            bail!("no {category} files loaded for any city; nothing to merge");
        }
    }

    // Union of parameters across all cities keeps every city's frame on an
    // identical schema so they stack cleanly.
    let params: Vec<String> = pivots
        .iter()
        .flat_map(|(_, pivot)| pivot.values())
        .flat_map(|row| row.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut combined: Option<DataFrame> = None;
    for (city, pivot) in &pivots {
        let mut city_df = city_frame(city, pivot, &params)?;
        if persist {
            let path = config
                .output_dir
                .join("features")
                .join(format!("{city}_features.csv"));
            write_csv_frame(&mut city_df, &path)
                .with_context(|| format!("persisting features for {city}"))?;
            info!(city = city.as_str(), path = %path.display(), "features persisted");
        }
        combined = Some(match combined {
            Some(acc) => acc.vstack(&city_df)?,
            None => city_df,
        });
    }

    combined.context("no city produced any feature rows")
}

/// One city's pivoted feature table, (city, date) unique by construction.
fn city_frame(city: &str, pivot: &CityPivot, params: &[String]) -> Result<DataFrame> {
    let dates: Vec<String> = pivot.keys().map(|d| d.to_string()).collect();
    let years: Vec<i64> = pivot.keys().map(|d| d.year() as i64).collect();
    let months: Vec<i64> = pivot.keys().map(|d| d.month() as i64).collect();
    let cities: Vec<&str> = std::iter::repeat(city).take(pivot.len()).collect();

    let mut columns = vec![
        Series::new("DATE", dates),
        Series::new("CITY", cities),
        Series::new("YEAR", years),
        Series::new("MONTH", months),
    ];
    for param in params {
        let values: Vec<Option<f64>> = pivot.values().map(|row| row.get(param).copied()).collect();
        columns.push(Series::new(param, values));
    }
    DataFrame::new(columns).context("assembling city feature frame")
}

/// Melt a feature table back into (date, param, value) triples. Exposed for
/// verification; the forward pipeline never needs it.
pub fn melt_features(df: &DataFrame, params: &[String]) -> Result<Vec<(String, String, f64)>> {
    let dates = df.column("DATE")?.utf8()?;
    let mut long = Vec::new();
    for param in params {
        let values = df.column(param)?.cast(&DataType::Float64)?;
        let values = values.f64()?;
        for (date, value) in dates.into_iter().zip(values.into_iter()) {
            if let (Some(date), Some(value)) = (date, value) {
                long.push((date.to_string(), param.clone(), value));
            }
        }
    }
    long.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.total_cmp(&b.2))
    });
    Ok(long)
}

/// Check the raw directory exists before a run starts, with a path-bearing
/// diagnostic.
pub fn check_input_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("input directory '{}' does not exist", dir.display());
    }
    Ok(())
}
