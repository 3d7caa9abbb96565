//! Recursive multi-step forecasting.
//!
//! Each city runs an independent state machine. The state is the last known
//! observation (actual or synthetic): frozen covariates plus the current lag
//! window. One transition advances a calendar month, predicts with the
//! current state, emits a forecast row, and rotates the prediction into the
//! lag window (new lag-1 = the prediction, deeper lags shift down). The
//! recursion never consults anything beyond its own regenerated lag state.
//!
//! Cities share no state, so the fan-out is a plain rayon parallel map with
//! a collect at the end.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::warn;
use urja_core::next_month;

use crate::lags::LagRow;
use crate::model::{feature_vector, EnergyModel};

/// One synthetic future observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub city: String,
    pub value: f64,
}

/// Per-city accumulator threaded through the iteration.
struct CityState {
    city: String,
    city_code: usize,
    covariates: Vec<f64>,
    lags: Vec<f64>,
}

impl CityState {
    fn seed(row: &LagRow) -> Self {
        Self {
            city: row.city.clone(),
            city_code: row.city_code,
            covariates: row.covariates.clone(),
            lags: row.lags.clone(),
        }
    }

    /// Rotate the prediction into the lag window: the new shallowest lag is
    /// the prediction, each deeper lag takes its shallower neighbour's old
    /// value, and the deepest old value falls off.
    fn advance(&mut self, prediction: f64) {
        self.lags.rotate_right(1);
        if let Some(first) = self.lags.first_mut() {
            *first = prediction;
        }
    }
}

/// Forecast every city with at least one lag-complete row through December
/// of (last historical year + `horizon_years`).
///
/// Cities with no lag-complete history cannot seed the recursion and are
/// skipped with a warning. Output is sorted by (city, date).
pub fn forecast_all(
    model: &EnergyModel,
    lag_rows: &[LagRow],
    horizon_years: u32,
) -> Result<Vec<ForecastRow>> {
    let Some(last_date) = lag_rows.iter().map(|r| r.date).max() else {
        warn!("no lag-complete rows at all; nothing to forecast");
        return Ok(Vec::new());
    };
    let future_dates = future_months(last_date, horizon_years);

    // Latest lag-complete row per city seeds that city's state.
    let mut seeds: BTreeMap<&str, &LagRow> = BTreeMap::new();
    for row in lag_rows {
        let entry = seeds.entry(row.city.as_str()).or_insert(row);
        if row.date > entry.date {
            *entry = row;
        }
    }

    let seeds: Vec<&LagRow> = seeds.into_values().collect();
    let mut rows: Vec<ForecastRow> = seeds
        .par_iter()
        .map(|seed| forecast_city(model, CityState::seed(seed), &future_dates))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    rows.sort_by(|a, b| a.city.cmp(&b.city).then(a.date.cmp(&b.date)));
    Ok(rows)
}

fn forecast_city(
    model: &EnergyModel,
    mut state: CityState,
    future_dates: &[NaiveDate],
) -> Result<Vec<ForecastRow>> {
    let mut out = Vec::with_capacity(future_dates.len());
    for date in future_dates {
        let features = feature_vector(state.city_code, &state.covariates, &state.lags);
        let prediction = model.predict_one(&features)?;
        out.push(ForecastRow {
            date: *date,
            city: state.city.clone(),
            value: prediction,
        });
        state.advance(prediction);
    }
    Ok(out)
}

/// Every first-of-month from the month after `last` through December of
/// (last year + horizon).
fn future_months(last: NaiveDate, horizon_years: u32) -> Vec<NaiveDate> {
    let end_year = last.year() + horizon_years as i32;
    let mut dates = Vec::new();
    let mut current = next_month(last);
    while current.year() <= end_year {
        dates.push(current);
        current = next_month(current);
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::train;
    use crate::ForecastOptions;

    fn lag_rows_for(city: &str, code: usize, months: usize) -> Vec<LagRow> {
        (0..months)
            .map(|i| {
                let target = 50.0 + i as f64;
                LagRow {
                    date: NaiveDate::from_ymd_opt(2020 + (i / 12) as i32, (i % 12) as u32 + 1, 1)
                        .unwrap(),
                    city: city.to_string(),
                    city_code: code,
                    covariates: vec![(i % 12) as f64],
                    lags: vec![target - 1.0, target - 12.0],
                    target,
                }
            })
            .collect()
    }

    fn quick_model(rows: &[LagRow]) -> EnergyModel {
        let options = ForecastOptions {
            trees: 10,
            max_depth: 5,
            ..ForecastOptions::default()
        };
        train(rows, &options).unwrap()
    }

    #[test]
    fn horizon_of_ten_years_past_december_yields_120_rows() {
        // History ends December 2024.
        let rows = lag_rows_for("Pune", 0, 60);
        assert_eq!(
            rows.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
        );
        let model = quick_model(&rows);
        let forecast = forecast_all(&model, &rows, 10).unwrap();
        assert_eq!(forecast.len(), 120);
        assert_eq!(
            forecast.first().unwrap().date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(
            forecast.last().unwrap().date,
            NaiveDate::from_ymd_opt(2034, 12, 1).unwrap()
        );
        assert!(forecast.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn future_months_handles_midyear_history_end() {
        let last = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let dates = future_months(last, 1);
        // Jul..Dec 2024 plus all of 2025.
        assert_eq!(dates.len(), 6 + 12);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(
            *dates.last().unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
    }

    #[test]
    fn lag_window_rotates_prediction_in() {
        let rows = lag_rows_for("Pune", 0, 24);
        let seed = rows.last().unwrap();
        let mut state = CityState::seed(seed);
        let old_lag1 = state.lags[0];
        state.advance(999.0);
        assert_eq!(state.lags[0], 999.0);
        assert_eq!(state.lags[1], old_lag1);
    }

    #[test]
    fn cities_forecast_independently_and_sorted() {
        let mut rows = lag_rows_for("Delhi", 0, 36);
        rows.extend(lag_rows_for("Pune", 1, 36));
        let model = quick_model(&rows);
        let forecast = forecast_all(&model, &rows, 1).unwrap();
        assert_eq!(forecast.len(), 2 * 12);
        let delhi: Vec<_> = forecast.iter().filter(|r| r.city == "Delhi").collect();
        assert_eq!(delhi.len(), 12);
        // City-major ordering.
        assert_eq!(forecast[0].city, "Delhi");
        assert_eq!(forecast.last().unwrap().city, "Pune");
    }

    #[test]
    fn empty_history_forecasts_nothing() {
        let rows = lag_rows_for("Pune", 0, 24);
        let model = quick_model(&rows);
        let forecast = forecast_all(&model, &[], 10).unwrap();
        assert!(forecast.is_empty());
    }
}
