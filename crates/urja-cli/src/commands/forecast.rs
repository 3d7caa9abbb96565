use std::path::{Path, PathBuf};

use anyhow::Result;
use urja_core::PipelineConfig;
use urja_forecast::{run_forecast, ForecastOptions};
use urja_pipeline::MASTER_FILE;

/// Default name of the combined actual/forecast output.
pub const FORECAST_FILE: &str = "FORECAST_DATASET.csv";

pub fn handle(
    config: &PipelineConfig,
    master: Option<&Path>,
    out: Option<&Path>,
    horizon: Option<u32>,
    target: Option<&str>,
    covariates: Option<&[String]>,
) -> Result<()> {
    let master: PathBuf = master
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_dir.join(MASTER_FILE));
    let out: PathBuf = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_dir.join(FORECAST_FILE));

    let mut options = ForecastOptions::from_config(config);
    if let Some(horizon) = horizon {
        options.horizon_years = horizon;
    }
    if let Some(target) = target {
        options.target = target.to_string();
    }
    if let Some(covariates) = covariates {
        if !covariates.is_empty() {
            options.covariates = covariates.to_vec();
        }
    }

    let summary = run_forecast(&master, &out, &options)?;
    println!(
        "Model: MAE {:.3}  RMSE {:.3}  R² {:.3}  (train {} / test {})",
        summary.metrics.mae,
        summary.metrics.rmse,
        summary.metrics.r2,
        summary.metrics.train_rows,
        summary.metrics.test_rows
    );
    println!(
        "Forecast: {} historical + {} forecast rows across {} cities ({})",
        summary.historical_rows,
        summary.forecast_rows,
        summary.cities_forecast,
        summary.path.display()
    );
    if !summary.cities_skipped.is_empty() {
        println!("Skipped (history too short): {}", summary.cities_skipped.join(", "));
    }
    Ok(())
}
