//! Command-line interface for repokit
//!
//! The binary exposes the fixture pipeline for inspecting batch files
//! outside a test run:
//!
//! - `plan` - print the collection each batch resolves to, optionally with a
//!   recorded dry-run of `setup_content`
//! - `validate` - check batches without invoking any factory
//! - `kinds` - list the registered resource kinds
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - log level (debug / errors only)
//! - `--config <PATH>` - configuration file, overriding discovery
//! - `--no-color` - plain output
//!
//! # Examples
//!
//! ```bash
//! repokit plan batches/rhel.toml --param distro=rhel8
//! repokit --verbose validate batches/rhel.toml --scope module
//! repokit --config ci/repokit.toml kinds --format json
//! ```

pub mod common;
pub mod kinds;
pub mod plan;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::RepokitConfig;
use common::CommandContext;

/// Runtime configuration for CLI execution.
///
/// Collected from the global flags so that tests and programmatic callers
/// can run commands without touching process-wide state.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` leaves logging to `RUST_LOG`.
    pub log_level: Option<String>,

    /// Disable colored output.
    pub no_color: bool,

    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a new CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the stderr log subscriber and the color override.
    ///
    /// `RUST_LOG` wins over the flag-derived level when set. Safe to call
    /// more than once; later subscribers are ignored.
    pub fn init(&self) {
        if self.no_color {
            colored::control::set_override(false);
        }

        let filter = match std::env::var("RUST_LOG") {
            Ok(_) => EnvFilter::from_default_env(),
            Err(_) => EnvFilter::new(self.log_level.as_deref().unwrap_or("warn")),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for repokit
#[derive(Parser, Debug)]
#[command(
    name = "repokit",
    about = "Resolve parametrized repository batches into repository collections",
    version,
    long_about = "repokit normalizes declarative repository batches, resolves parameter \
                  indirections against scoped bindings and builds repository collections, \
                  the way the repos_collection test fixtures do."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file (overrides REPOKIT_CONFIG and discovery)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the repository collection each batch resolves to
    Plan(plan::PlanCommand),

    /// Check a batch file without building repositories
    Validate(validate::ValidateCommand),

    /// List registered resource kinds
    Kinds(kinds::KindsCommand),
}

impl Cli {
    /// Execute the parsed command with configuration from the flags.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Build a [`CliConfig`] from the parsed CLI arguments.
    ///
    /// - `--verbose` -> `debug`
    /// - `--quiet` -> `error`
    /// - otherwise -> `info`
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            no_color: self.no_color,
            config_path: self.config.clone(),
        }
    }

    /// Execute the CLI with a specific configuration.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init();

        let repokit_config = RepokitConfig::load(config.config_path.as_deref())?;
        let ctx = CommandContext::new(repokit_config)?;

        match self.command {
            Commands::Plan(cmd) => cmd.execute(&ctx),
            Commands::Validate(cmd) => cmd.execute(&ctx),
            Commands::Kinds(cmd) => cmd.execute(&ctx),
        }
    }
}
