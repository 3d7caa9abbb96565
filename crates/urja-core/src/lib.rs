//! # urja-core: shared types for the renewable-energy analytics pipeline
//!
//! Provides the pieces every stage depends on:
//!
//! - [`error`] - the unified [`UrjaError`] / [`UrjaResult`] pair
//! - [`config`] - the explicit [`PipelineConfig`] threaded through stages
//! - [`city`] - the fixed city dimension and raw-file categories
//! - [`table`] - row types and calendar helpers shared between stages
//!
//! The pipeline is a strict one-direction flow: raw matrices are reshaped
//! (urja-io), aggregated and joined into a master dataset (urja-pipeline),
//! extended ten years by a recursive forecaster (urja-forecast), and finally
//! rendered (urja-cli). No stage mutates another stage's output; each
//! consumes an immutable table and produces a new one.

pub mod city;
pub mod config;
pub mod error;
pub mod table;

pub use city::{distinct_cities, encode_city, Category, CITIES};
pub use config::{load_config_from_path, PipelineConfig};
pub use error::{UrjaError, UrjaResult};
pub use table::{month_number, month_start, next_month, LongObservation, MONTHS};
