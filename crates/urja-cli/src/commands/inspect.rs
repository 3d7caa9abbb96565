use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Print the first `rows` lines of a raw file verbatim. Raw exports carry
/// free-text metadata above the header, so this goes line by line rather
/// than through the CSV reader.
pub fn handle(file: &Path, rows: usize) -> Result<()> {
    let contents = fs::read_to_string(file)
        .with_context(|| format!("reading '{}'", file.display()))?;
    for (i, line) in contents.lines().take(rows).enumerate() {
        println!("{:>4}  {line}", i + 1);
    }
    Ok(())
}
