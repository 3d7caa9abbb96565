//! # urja-forecast: lag features, model training, recursive forecasting
//!
//! Takes the master dataset and extends each city's target series to a
//! fixed horizon by recursive one-step prediction:
//!
//! - [`standardize`] - canonical column names and typed row extraction
//! - [`lags`] - per-city lag-feature construction
//! - [`model`] - random-forest fit on a chronological split, MAE/RMSE/R²
//! - [`recursive`] - the per-city forecast state machine
//! - [`combine`] - actual + forecast rows with a DATA_TYPE flag
//! - [`runner`] - the end-to-end run, CSV to CSV

pub mod combine;
pub mod lags;
pub mod model;
pub mod recursive;
pub mod runner;
pub mod standardize;

pub use combine::{combined_frame, FLAG_ACTUAL, FLAG_FORECAST};
pub use lags::{build_lag_rows, LagRow};
pub use model::{train, EnergyModel, EvalMetrics};
pub use recursive::{forecast_all, ForecastRow};
pub use runner::{run_forecast, ForecastSummary};
pub use standardize::{extract_rows, standardize_columns, MasterRow};

/// Knobs for one forecast run. Model constants default to the values the
/// historical pipeline was tuned with.
#[derive(Debug, Clone)]
pub struct ForecastOptions {
    /// Target column after standardization.
    pub target: String,
    /// Covariate columns fed to the model alongside the city code and lags.
    pub covariates: Vec<String>,
    /// Lag depths in months, shallowest first.
    pub lag_depths: Vec<u32>,
    /// Years to extend past the last historical date.
    pub horizon_years: u32,
    /// Fraction of rows (chronologically earliest) used for training.
    pub split: f64,
    pub trees: u16,
    pub max_depth: u16,
    pub seed: u64,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            target: "ENERGY_GENERATED".to_string(),
            covariates: vec![
                "EFFICIENCY_INDEX".to_string(),
                "SUNSHINE_HOURS".to_string(),
                "SOLAR_IRRADIANCE".to_string(),
                "TEMPERATURE".to_string(),
                "WIND_SPEED".to_string(),
                "HUMIDITY".to_string(),
            ],
            lag_depths: vec![1, 12],
            horizon_years: 10,
            split: 0.8,
            trees: 400,
            max_depth: 20,
            seed: 42,
        }
    }
}

impl ForecastOptions {
    /// Derive a run's options from the pipeline config, keeping model
    /// constants at their defaults.
    pub fn from_config(config: &urja_core::PipelineConfig) -> Self {
        Self {
            target: config.target.clone(),
            covariates: config.covariates.clone(),
            lag_depths: config.lag_depths.clone(),
            horizon_years: config.horizon_years,
            ..Self::default()
        }
    }
}
