//! Auxiliary table loaders.
//!
//! The four secondary sources (sunshine, cloud cover, population, energy)
//! come from different providers with inconsistent header spellings, so the
//! loaders rename columns positionally: column order, not header text, is
//! the authoritative contract.
//!
//! Annual sources carry no MONTH column and broadcast across all twelve
//! months when joined downstream.

use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;

use crate::frame::read_csv_frame;

/// Declared positional schema of one auxiliary source.
#[derive(Debug, Clone)]
pub struct AuxSpec {
    /// Source label used in diagnostics.
    pub name: &'static str,
    /// Canonical column names assigned by position.
    pub columns: &'static [&'static str],
    /// Join key subset; the remaining columns are payload.
    pub keys: &'static [&'static str],
}

pub const SUNSHINE: AuxSpec = AuxSpec {
    name: "sunshine",
    columns: &["CITY", "YEAR", "MONTH", "Sunshine_Hours"],
    keys: &["CITY", "YEAR", "MONTH"],
};

pub const CLOUD_COVER: AuxSpec = AuxSpec {
    name: "cloud cover",
    columns: &["CITY", "YEAR", "MONTH", "Cloud_Cover"],
    keys: &["CITY", "YEAR", "MONTH"],
};

pub const POPULATION: AuxSpec = AuxSpec {
    name: "population",
    columns: &[
        "CITY",
        "YEAR",
        "Population",
        "Population_Density",
        "Growth_Rate",
    ],
    keys: &["CITY", "YEAR"],
};

pub const ENERGY: AuxSpec = AuxSpec {
    name: "energy",
    columns: &[
        "CITY",
        "State",
        "YEAR",
        "Energy_Consumption_GWh",
        "Per_Capita_kWh",
        "Peak_Demand_MW",
    ],
    keys: &["CITY", "YEAR"],
};

/// All auxiliary sources in join order, paired with their conventional
/// file names under the input directory.
pub const AUX_SOURCES: [(&str, &AuxSpec); 4] = [
    ("sunshine_india_2015_2024.csv", &SUNSHINE),
    ("cloudcover_india_2015_2024.csv", &CLOUD_COVER),
    ("final_population_2015_2024.csv", &POPULATION),
    ("city_energy_2015_2024.csv", &ENERGY),
];

/// Load one auxiliary CSV, rename its columns positionally, coerce key
/// types, and reject duplicate key tuples.
pub fn load_aux(path: &Path, spec: &AuxSpec) -> Result<DataFrame> {
    let df = read_csv_frame(path)
        .with_context(|| format!("loading {} auxiliary table", spec.name))?;
    if df.width() < spec.columns.len() {
        bail!(
            "{} table '{}' has {} columns, expected at least {}",
            spec.name,
            path.display(),
            df.width(),
            spec.columns.len()
        );
    }

    // Keep only the declared columns, by position.
    let positional: Vec<String> = df
        .get_column_names()
        .iter()
        .take(spec.columns.len())
        .map(|s| s.to_string())
        .collect();
    let mut df = df.select(&positional)?;
    df.set_column_names(spec.columns)?;

    // Year/Month arrive as whatever the provider typed; normalize to Int64
    // so join keys line up with the feature table.
    for key in spec.keys {
        if *key == "CITY" {
            continue;
        }
        let coerced = df.column(key)?.cast(&DataType::Int64)?;
        df.with_column(coerced)?;
    }

    validate_unique_keys(&df, spec.keys)
        .with_context(|| format!("validating {} join keys", spec.name))?;
    Ok(df)
}

/// Reject tables whose key tuples are not unique. A duplicate key would fan
/// out rows in a left join and silently break the accumulator's row-count
/// invariant, so it is treated as a data-quality defect up front.
pub fn validate_unique_keys(df: &DataFrame, keys: &[&str]) -> Result<()> {
    let columns: Vec<&Series> = keys
        .iter()
        .map(|key| df.column(key).map_err(anyhow::Error::from))
        .collect::<Result<_>>()?;

    let mut seen = std::collections::HashSet::with_capacity(df.height());
    for row in 0..df.height() {
        let mut tuple = String::new();
        for series in &columns {
            let value = series.get(row)?;
            tuple.push_str(&value.to_string());
            tuple.push('\u{1f}');
        }
        if !seen.insert(tuple) {
            let rendered: Vec<String> = columns
                .iter()
                .map(|s| s.get(row).map(|v| v.to_string()))
                .collect::<PolarsResult<_>>()?;
            bail!(
                "duplicate key tuple ({}) at row {}; key columns [{}] must be unique",
                rendered.join(", "),
                row,
                keys.join(", ")
            );
        }
    }
    Ok(())
}
