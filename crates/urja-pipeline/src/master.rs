//! Master dataset assembly.
//!
//! Orchestrates the downstream flow: aggregate city features, fold in the
//! auxiliary tables that exist, compute derived columns, put the key columns
//! first, and write one flat CSV. Missing auxiliary files are reported and
//! skipped; the feature aggregation's own fatality rules still apply.

use std::path::PathBuf;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::{info, warn};
use urja_core::PipelineConfig;
use urja_io::auxiliary::AUX_SOURCES;
use urja_io::{load_aux, write_csv_frame};

use crate::derived::add_wind_power_density;
use crate::features::{aggregate_cities, check_input_dir};
use crate::join::join_auxiliary;

/// Name of the merged output under the configured output directory.
pub const MASTER_FILE: &str = "MASTER_DATASET.csv";

#[derive(Debug)]
pub struct MasterSummary {
    pub rows: usize,
    pub columns: usize,
    pub path: PathBuf,
}

/// Build and write the master dataset. Returns row/column counts for the
/// caller to log.
pub fn build_master(config: &PipelineConfig, persist_features: bool) -> Result<MasterSummary> {
    check_input_dir(&config.input_dir)?;

    let mut acc = aggregate_cities(config, persist_features)?;

    for (file_name, spec) in AUX_SOURCES {
        let path = config.input_dir.join(file_name);
        if !path.exists() {
            warn!(table = spec.name, path = %path.display(), "auxiliary file absent, skipped");
            continue;
        }
        let aux = load_aux(&path, spec)?;
        acc = join_auxiliary(acc, &aux, spec.keys, spec.name)?;
    }

    add_wind_power_density(&mut acc)?;

    let mut master = reorder_key_columns(&acc)?;
    let path = config.output_dir.join(MASTER_FILE);
    write_csv_frame(&mut master, &path).context("writing master dataset")?;
    info!(rows = master.height(), columns = master.width(), path = %path.display(), "master dataset written");

    Ok(MasterSummary {
        rows: master.height(),
        columns: master.width(),
        path,
    })
}

/// DATE, CITY, YEAR, MONTH first; remaining columns keep their order.
fn reorder_key_columns(df: &DataFrame) -> Result<DataFrame> {
    let front = ["DATE", "CITY", "YEAR", "MONTH"];
    let mut order: Vec<String> = front
        .iter()
        .filter(|name| df.column(name).is_ok())
        .map(|name| name.to_string())
        .collect();
    for name in df.get_column_names() {
        if !front.contains(&name) {
            order.push(name.to_string());
        }
    }
    df.select(order).context("reordering master columns")
}
