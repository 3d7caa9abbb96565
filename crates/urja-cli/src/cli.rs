use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

/// The full command tree, for completion generation.
pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Renewable-energy analytics pipeline for Indian cities", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Pipeline configuration file (YAML or JSON)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reshape raw climate matrices into long DATE,PARAM,VALUE CSVs
    Convert {
        /// Raw file or directory (defaults to the configured input dir)
        #[arg(long, value_hint = ValueHint::AnyPath)]
        input: Option<PathBuf>,
        /// Output directory for cleaned files
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        out: Option<PathBuf>,
    },
    /// Build per-city feature tables and the concatenated feature CSV
    Features,
    /// Build the master dataset: aggregate, join auxiliaries, derive columns
    Merge {
        /// Also persist per-city feature artifacts
        #[arg(long)]
        persist_features: bool,
    },
    /// Train the model and write the combined actual/forecast dataset
    Forecast {
        /// Master dataset CSV (defaults to the configured output location)
        #[arg(long, value_hint = ValueHint::FilePath)]
        master: Option<PathBuf>,
        /// Output CSV path
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Forecast horizon in years past the last historical date
        #[arg(long)]
        horizon: Option<u32>,
        /// Target column to forecast
        #[arg(long)]
        target: Option<String>,
        /// Covariate columns fed to the model, comma-separated
        #[arg(long, value_delimiter = ',')]
        covariates: Option<Vec<String>>,
    },
    /// Render one of the four objective views over the finished tables
    Dashboard {
        /// Master dataset CSV
        #[arg(long, value_hint = ValueHint::FilePath)]
        master: Option<PathBuf>,
        /// Combined actual/forecast CSV
        #[arg(long, value_hint = ValueHint::FilePath)]
        forecast: Option<PathBuf>,
        /// City to display
        #[arg(long)]
        city: String,
        /// Start of the date range, inclusive (YYYY-MM-DD)
        #[arg(long, default_value = "2014-01-01")]
        from: String,
        /// End of the date range, inclusive (YYYY-MM-DD)
        #[arg(long, default_value = "2024-12-31")]
        to: String,
        /// Objective view: 1 generation, 2 efficiency, 3 weather, 4 forecast
        #[arg(long, default_value_t = 1)]
        objective: u8,
        /// Weather variable for objective 3
        #[arg(long, default_value = "SUNSHINE_HOURS")]
        weather: String,
    },
    /// Print the first rows of a raw file for eyeballing export metadata
    Inspect {
        /// File to inspect
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Number of leading rows to print
        #[arg(long, default_value_t = 20)]
        rows: usize,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}
