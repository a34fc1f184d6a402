//! # Battle Analytics CLI Binary
//!
//! Command-line interface for running battle reports.

use anyhow::Result;
use battle_analytics::cli::{Cli, CliHandler};
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; reports go to stdout, logs to stderr
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    // Create CLI handler
    let handler = CliHandler::new(&cli).await?;

    // Handle command
    handler.handle_command(cli.command).await?;

    Ok(())
}
