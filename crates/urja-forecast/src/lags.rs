//! Lag-feature construction.
//!
//! For each city in chronological order, a row gains one lag column per
//! configured depth: the target's value that many months earlier in the
//! same city's series. Lags are positional (N rows back), matching the
//! monthly cadence of the data. Rows whose lags are undefined (a city's
//! first N rows) are dropped, so a city shorter than the deepest lag
//! contributes nothing to training; that is expected, not an error.

use chrono::NaiveDate;
use urja_core::encode_city;

use crate::standardize::MasterRow;

/// A lag-augmented training row.
#[derive(Debug, Clone)]
pub struct LagRow {
    pub date: NaiveDate,
    pub city: String,
    /// Index of the city in the sorted distinct city list.
    pub city_code: usize,
    pub covariates: Vec<f64>,
    /// Aligned with the lag-depth list, shallowest first.
    pub lags: Vec<f64>,
    pub target: f64,
}

/// Build lag rows from (city, date)-sorted master rows.
///
/// Rows for cities absent from `cities` are excluded rather than erroring;
/// the encoder's domain is the model's domain.
pub fn build_lag_rows(rows: &[MasterRow], cities: &[String], lag_depths: &[u32]) -> Vec<LagRow> {
    let mut out = Vec::with_capacity(rows.len());
    let mut start = 0;
    while start < rows.len() {
        let city = &rows[start].city;
        let end = rows[start..]
            .iter()
            .position(|r| &r.city != city)
            .map(|offset| start + offset)
            .unwrap_or(rows.len());
        let slice = &rows[start..end];

        if let Some(city_code) = encode_city(cities, city) {
            for (i, row) in slice.iter().enumerate() {
                let lags: Option<Vec<f64>> = lag_depths
                    .iter()
                    .map(|depth| i.checked_sub(*depth as usize).map(|j| slice[j].target))
                    .collect();
                if let Some(lags) = lags {
                    out.push(LagRow {
                        date: row.date,
                        city: row.city.clone(),
                        city_code,
                        covariates: row.covariates.clone(),
                        lags,
                        target: row.target,
                    });
                }
            }
        }
        start = end;
    }
    out
}
