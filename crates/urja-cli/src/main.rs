use std::fs;
use std::io;
use std::path::Path;
use std::process;

use clap::Parser;
use clap_complete::{generate, Shell};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;
use urja_cli::cli::{build_cli_command, Cli, Commands};
use urja_core::{load_config_from_path, PipelineConfig};

mod commands;

use commands::{convert, dashboard, features, forecast, inspect, merge};

fn resolve_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(path) => load_config_from_path(path),
        None => Ok(PipelineConfig::default()),
    }
}

fn generate_completions(shell: Shell, out: Option<&Path>) -> anyhow::Result<()> {
    let mut cmd = build_cli_command();
    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        generate(shell, &mut cmd, "urja", &mut file);
        println!("Wrote {shell:?} completion to {}", path.display());
    } else {
        let stdout = &mut io::stdout();
        generate(shell, &mut cmd, "urja", stdout);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Loading config failed: {:?}", e);
            process::exit(1);
        }
    };

    let result = match &cli.command {
        Commands::Convert { input, out } => {
            convert::handle(&config, input.as_deref(), out.as_deref())
        }
        Commands::Features => features::handle(&config),
        Commands::Merge { persist_features } => merge::handle(&config, *persist_features),
        Commands::Forecast {
            master,
            out,
            horizon,
            target,
            covariates,
        } => forecast::handle(
            &config,
            master.as_deref(),
            out.as_deref(),
            *horizon,
            target.as_deref(),
            covariates.as_deref(),
        ),
        Commands::Dashboard {
            master,
            forecast,
            city,
            from,
            to,
            objective,
            weather,
        } => dashboard::handle(
            &config,
            master.as_deref(),
            forecast.as_deref(),
            city,
            from,
            to,
            *objective,
            weather,
        ),
        Commands::Inspect { file, rows } => inspect::handle(file, *rows),
        Commands::Completions { shell, out } => generate_completions(*shell, out.as_deref()),
    };

    match result {
        Ok(()) => info!("Command successful"),
        Err(e) => {
            error!("Command failed: {:?}", e);
            process::exit(1);
        }
    }
}
