//! `domain-master` command-line entry point.
//!
//! Loads the configuration, wires the JSON store and the RDAP client into an
//! `AppState`, and dispatches the subcommand. Logs go to stderr; command output
//! goes to stdout.

mod args;
mod commands;
mod output;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use domain_master_app::AppStateBuilder;
use domain_master_app::config::AppConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(data_file) = cli.data_file.clone() {
        config.storage.data_file = Some(data_file);
    }

    init_tracing(&config.log.level);

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing to stderr. `RUST_LOG` takes precedence over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    let app = AppStateBuilder::from_config(config)
        .context("Invalid configuration")?
        .build()?;
    tracing::debug!("Data file: {}", config.storage.data_file().display());
    commands::run(&app, cli.command).await
}
