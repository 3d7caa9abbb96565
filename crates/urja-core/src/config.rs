//! Pipeline configuration.
//!
//! Every stage takes its paths and knobs from an explicit [`PipelineConfig`]
//! rather than hardcoded locations. The config is loadable from YAML or JSON
//! (extension decides, with a best-effort fallback) and every field has a
//! default, so an empty file is a valid config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::city::CITIES;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the raw exports and auxiliary CSVs.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Directory that receives cleaned, feature, master, and forecast CSVs.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Cities to aggregate; drives `{city}_{category}.csv` discovery.
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,
    /// Raw-file categories to load per city.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Covariate columns fed to the model alongside the city code and lags.
    /// Columns absent from the master table are dropped at run time.
    #[serde(default = "default_covariates")]
    pub covariates: Vec<String>,
    /// Lag depths (in months) used as model features.
    #[serde(default = "default_lag_depths")]
    pub lag_depths: Vec<u32>,
    /// Forecast horizon in years beyond the last historical date.
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,
    /// Target column forecast by the model, after standardization.
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_cities() -> Vec<String> {
    CITIES.iter().map(|c| c.to_string()).collect()
}

fn default_categories() -> Vec<String> {
    vec!["solar".to_string(), "wind".to_string()]
}

fn default_covariates() -> Vec<String> {
    [
        "EFFICIENCY_INDEX",
        "SUNSHINE_HOURS",
        "SOLAR_IRRADIANCE",
        "TEMPERATURE",
        "WIND_SPEED",
        "HUMIDITY",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_lag_depths() -> Vec<u32> {
    vec![1, 12]
}

fn default_horizon_years() -> u32 {
    10
}

fn default_target() -> String {
    "ENERGY_GENERATED".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            cities: default_cities(),
            categories: default_categories(),
            covariates: default_covariates(),
            lag_depths: default_lag_depths(),
            horizon_years: default_horizon_years(),
            target: default_target(),
        }
    }
}

impl PipelineConfig {
    /// Path of a raw export for a (city, category) pair.
    pub fn raw_path(&self, city: &str, category: &str) -> PathBuf {
        self.input_dir.join(format!("{city}_{category}.csv"))
    }
}

pub fn load_config_from_path(path: &Path) -> Result<PipelineConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading pipeline config '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing pipeline config yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing pipeline config json")
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing pipeline config"),
    }
}
