//! Assetry CLI
//!
//! Command-line interface for the Assetry asset console.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use assetry_cli::{Cli, commands};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "info,assetry=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut out = std::io::stdout();
    commands::execute(cli, &mut out).await?;
    Ok(())
}
