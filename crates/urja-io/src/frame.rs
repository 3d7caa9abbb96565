//! DataFrame read/write helpers.
//!
//! The pipeline's external contract is flat CSV on both sides, so these
//! helpers deliberately support nothing else.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

/// Read a CSV file into a DataFrame, first row as header.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    CsvReader::new(&mut file)
        .has_header(true)
        .finish()
        .with_context(|| format!("reading CSV {}", path.display()))
}

/// Write a DataFrame as CSV, creating parent directories as needed.
///
/// No index column is persisted; the frame's columns are the file's columns.
pub fn write_csv_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("writing CSV {}", path.display()))
}
