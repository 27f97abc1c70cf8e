//! Podgate CLI
//!
//! Inspect and change access on Solid pods from the command line. Results
//! are printed as JSON.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,podgate=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    commands::run(cli).await
}
