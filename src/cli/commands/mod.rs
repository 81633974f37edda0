//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod check;
mod config_cmd;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::analysis::AnalysisMethod;
use crate::config::{load_settings, LoadOptions};

#[derive(Parser)]
#[command(name = "ernorm")]
#[command(about = "ER diagram review with OCR and vision language models")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ./ernorm.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web interface
    Serve {
        /// Bind address: PORT, HOST or HOST:PORT (defaults to the configured bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Analyze a single diagram and print the review
    Analyze {
        /// Diagram image (PNG or JPEG)
        image: PathBuf,
        /// Analysis method
        #[arg(short, long, value_enum, default_value_t = AnalysisMethod::OcrLlm)]
        method: AnalysisMethod,
        /// Print the analysis record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the model endpoint and OCR engine are reachable
    Check,

    /// Print the effective configuration as TOML
    Config,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(&LoadOptions {
        config_path: cli.config,
        ignore_env: false,
    })
    .await?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Analyze {
            image,
            method,
            json,
        } => analyze::cmd_analyze(&settings, &image, method, json).await,
        Commands::Check => check::cmd_check(&settings).await,
        Commands::Config => config_cmd::cmd_config_show(&settings),
    }
}
