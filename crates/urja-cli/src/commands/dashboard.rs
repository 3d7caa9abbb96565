use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use urja_cli::dashboard::{render, DashboardRequest};
use urja_core::PipelineConfig;
use urja_forecast::standardize_columns;
use urja_io::read_csv_frame;
use urja_pipeline::MASTER_FILE;

use crate::commands::forecast::FORECAST_FILE;

#[allow(clippy::too_many_arguments)]
pub fn handle(
    config: &PipelineConfig,
    master: Option<&Path>,
    forecast: Option<&Path>,
    city: &str,
    from: &str,
    to: &str,
    objective: u8,
    weather: &str,
) -> Result<()> {
    let master_path: PathBuf = master
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_dir.join(MASTER_FILE));
    let mut master = read_csv_frame(&master_path).context("loading master dataset")?;
    standardize_columns(&mut master)?;

    // The combined dataset is optional; only objective 4 needs it.
    let forecast_path: PathBuf = forecast
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_dir.join(FORECAST_FILE));
    let combined = if forecast_path.exists() {
        Some(read_csv_frame(&forecast_path).context("loading forecast dataset")?)
    } else {
        None
    };

    let request = DashboardRequest {
        city: city.to_string(),
        from: parse_bound(from)?,
        to: parse_bound(to)?,
        objective,
        weather: weather.to_string(),
    };
    print!("{}", render(&master, combined.as_ref(), &request)?);
    Ok(())
}

fn parse_bound(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("date '{value}' is not YYYY-MM-DD"))
}
