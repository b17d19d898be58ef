//! Cirrus - Main Entry Point
//!
//! Loads settings, installs tracing and runs one subcommand against the
//! configured provider.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use cirrus_infrastructure::{init_tracing, load_settings, set_provider_debug};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Installed first so settings warnings are not lost
    let filter = init_tracing(false)?;
    let settings = load_settings(cli.config.as_deref())?;
    if settings.connection.debug {
        set_provider_debug(&filter, true)?;
    }

    tracing::debug!("Starting Cirrus v{}", env!("CARGO_PKG_VERSION"));

    Ok(commands::run(cli, settings).await?)
}
