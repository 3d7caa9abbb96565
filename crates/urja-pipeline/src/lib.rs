//! # urja-pipeline: feature aggregation and merging
//!
//! The middle of the pipeline: takes reshaped long observations from
//! urja-io and produces the master dataset.
//!
//! - [`features`] - per-city pivot and cross-city concatenation
//! - [`join`] - sequential left joins against auxiliary tables
//! - [`derived`] - closed-form physics columns
//! - [`master`] - orchestration and the final CSV
//!
//! Row-count invariant: from the moment the feature table exists, joins add
//! columns but never rows.

pub mod derived;
pub mod features;
pub mod join;
pub mod master;

pub use derived::{add_wind_power_density, AIR_DENSITY_KG_M3};
pub use features::{aggregate_cities, SOLAR_PARAMS, WIND_PARAMS};
pub use join::{join_all, join_auxiliary};
pub use master::{build_master, MasterSummary, MASTER_FILE};
