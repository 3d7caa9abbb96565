use anyhow::{Context, Result};
use urja_core::PipelineConfig;
use urja_io::write_csv_frame;
use urja_pipeline::aggregate_cities;

/// Concatenated feature table written alongside the per-city artifacts.
pub const FEATURES_FILE: &str = "CITY_FEATURES.csv";

pub fn handle(config: &PipelineConfig) -> Result<()> {
    let mut combined = aggregate_cities(config, true)?;
    let path = config.output_dir.join(FEATURES_FILE);
    write_csv_frame(&mut combined, &path).context("writing combined feature table")?;
    println!(
        "Feature table: {} rows x {} columns ({})",
        combined.height(),
        combined.width(),
        path.display()
    );
    Ok(())
}
