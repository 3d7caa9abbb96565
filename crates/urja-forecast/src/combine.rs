//! Actual + forecast dataset assembly.
//!
//! Produces the single table the dashboard consumes: every historical row
//! and every synthetic row, same schema, distinguished by an explicit
//! DATA_TYPE flag, sorted city-major then by date.
//!
//! The schema is deliberately narrow: keys, the target, and the flag.
//! Synthetic rows have no real covariate values to carry, and the full
//! historical columns stay available in the master table, so padding them
//! here would only duplicate data as nulls.

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::recursive::ForecastRow;
use crate::standardize::MasterRow;

pub const FLAG_ACTUAL: &str = "Actual";
pub const FLAG_FORECAST: &str = "Forecast";

/// Build the combined DATE, CITY, target, DATA_TYPE frame.
pub fn combined_frame(
    historical: &[MasterRow],
    forecast: &[ForecastRow],
    target_name: &str,
) -> Result<DataFrame> {
    let mut rows: Vec<(String, &str, f64, &str)> = historical
        .iter()
        .map(|r| (r.date.to_string(), r.city.as_str(), r.target, FLAG_ACTUAL))
        .chain(
            forecast
                .iter()
                .map(|r| (r.date.to_string(), r.city.as_str(), r.value, FLAG_FORECAST)),
        )
        .collect();
    rows.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)));

    let dates: Vec<&str> = rows.iter().map(|r| r.0.as_str()).collect();
    let cities: Vec<&str> = rows.iter().map(|r| r.1).collect();
    let values: Vec<f64> = rows.iter().map(|r| r.2).collect();
    let flags: Vec<&str> = rows.iter().map(|r| r.3).collect();

    DataFrame::new(vec![
        Series::new("DATE", dates),
        Series::new("CITY", cities),
        Series::new(target_name, values),
        Series::new("DATA_TYPE", flags),
    ])
    .context("assembling combined actual/forecast frame")
}
