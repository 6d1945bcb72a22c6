//! formsift CLI tool.
//!
//! Usage:
//! ```bash
//! formsift check --profile profile.json input.json
//! formsift list-rules
//! formsift list-filters
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Validate and filter input records against declarative profiles
#[derive(Parser)]
#[command(name = "formsift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an input record against a profile
    Check {
        /// Input record to validate (JSON file, `-` for stdin)
        input: PathBuf,

        /// Profile definition file (.json or .toml)
        #[arg(short, long)]
        profile: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the rule constraints available to profiles
    ListRules,

    /// List the filters available to profiles
    ListFilters,
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            input,
            profile,
            format,
        } => commands::check::run(&input, &profile, format),
        Commands::ListRules => {
            commands::list::rules();
            Ok(())
        }
        Commands::ListFilters => {
            commands::list::filters();
            Ok(())
        }
    }
}
