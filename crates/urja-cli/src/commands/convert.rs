use std::path::Path;

use anyhow::Result;
use urja_core::PipelineConfig;
use urja_io::convert_path;

/// Reshape a raw file or every raw file in a directory. Cleaned files land
/// next to the raws unless an output directory is given.
pub fn handle(config: &PipelineConfig, input: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let input = input.unwrap_or(&config.input_dir);
    let out = out.unwrap_or(input);
    let summary = convert_path(input, out)?;
    println!(
        "Converted {} file(s), skipped {} ({})",
        summary.converted,
        summary.skipped,
        out.display()
    );
    Ok(())
}
