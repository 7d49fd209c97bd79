use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tc_cli::commands::report;
use tc_cli::{Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings are part of the user-facing output, so the default level is warn.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(registry) = cli.registry {
        config.registry_path = registry;
    }
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    report::run(
        &mut stdout.lock(),
        &cli.timing_file,
        &config.registry_path,
        cli.json,
    )
}
