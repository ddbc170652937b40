//! Texview - PDF preview server and build bridge for LaTeX trees.

mod cli;
mod compiler;
mod config;
mod core;
mod logger;
mod resolver;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PreviewConfig;
use std::sync::Arc;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(PreviewConfig::load(&cli)?);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::run_server(config),
        Commands::Build { path, line } => cli::build::run_build(&config, path, *line),
    }
}
