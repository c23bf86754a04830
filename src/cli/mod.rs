//! Command-line interface for goto.
//!
//! Bookmark management lives in its own commands; this module wires up the
//! global flags and the `update` subcommand.
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging to stderr
//! - `--quiet` / `-q`: errors only
//! - `--config` / `-c`: path to an alternate config file
//!
//! `RUST_LOG`, when set, takes precedence over both logging flags.

mod update;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use update::{UpdateCommand, console_sink};

/// Main CLI structure for goto.
#[derive(Parser, Debug)]
#[command(
    name = "goto",
    about = "Jump to named directory shortcuts",
    version,
    long_about = "goto keeps named shortcuts to directories and can update itself from published releases."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global config file
    #[arg(short, long, global = true, env = crate::config::CONFIG_ENV_VAR)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Update goto to the latest release
    Update(UpdateCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_filter());

        match self.command {
            Commands::Update(cmd) => cmd.execute(self.config).await,
        }
    }

    /// Log filter directive implied by the global flags.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `default_filter` when present. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
