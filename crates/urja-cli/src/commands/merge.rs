use anyhow::Result;
use urja_core::PipelineConfig;
use urja_pipeline::build_master;

pub fn handle(config: &PipelineConfig, persist_features: bool) -> Result<()> {
    let summary = build_master(config, persist_features)?;
    println!(
        "Master dataset: {} rows x {} columns ({})",
        summary.rows,
        summary.columns,
        summary.path.display()
    );
    Ok(())
}
