//! Command-line interface for ngdeps.
//!
//! Every command starts the same way: find `ngdeps.toml`, scan the configured
//! source roots into a module graph, then act on the graph.
//!
//! # Available Commands
//!
//! - `inject` - rewrite the marker regions of every configured template
//! - `validate` - report cycles, build issues and injection violations
//! - `resolve` - print the load order or files of one root module
//! - `graph` - export the module graph in Graphviz DOT format
//!
//! # Examples
//!
//! ```bash
//! # Rewrite templates, failing on any finding
//! ngdeps inject --strict
//!
//! # Machine-readable validation for CI
//! ngdeps --no-progress validate --format json
//!
//! # Inspect one module
//! ngdeps resolve app --tree
//! ngdeps graph --output modules.dot
//! ```
//!
//! # Logging
//!
//! Log output goes to stderr. `--verbose` raises the level to `debug`,
//! `--quiet` lowers it to `error`; `RUST_LOG` overrides both.

mod common;
mod graph;
mod inject;
mod resolve;
mod validate;

pub use validate::{OutputFormat, ValidationResults};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::constants::NO_PROGRESS_ENV;

/// Runtime settings derived from the global flags.
///
/// Kept separate from [`Cli`] so commands can be driven from tests without
/// parsing arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` keeps errors only
    pub log_level: Option<String>,
    /// Disable spinners and progress bars
    pub no_progress: bool,
    /// Explicit `ngdeps.toml` location
    pub config_path: Option<PathBuf>,
    /// Suppress informational output
    pub quiet: bool,
}

impl CliConfig {
    /// Create a configuration with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply this configuration to the process environment.
    ///
    /// Sets `NGDEPS_NO_PROGRESS` when progress output is disabled. Must be
    /// called once, before any other thread reads the environment.
    pub fn apply_to_env(&self) {
        if self.no_progress {
            // SAFETY: called at startup before any scan task is spawned.
            unsafe {
                std::env::set_var(NO_PROGRESS_ENV, "1");
            }
        }
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over [`CliConfig::log_level`]. A second
    /// call is a no-op.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("error"))
        });

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }
}

/// Static AngularJS module resolver and script tag injector.
#[derive(Parser)]
#[command(
    name = "ngdeps",
    about = "Resolve AngularJS module dependencies and inject script tags",
    version,
    long_about = "ngdeps scans JavaScript sources for angular.module declarations, builds the module dependency graph and rewrites marked regions of HTML templates with script tags in load order."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to ngdeps.toml (default: search from the current directory upwards)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable progress spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite the marker regions of every configured template
    Inject(inject::InjectCommand),

    /// Check the module graph and templates without writing anything
    Validate(validate::ValidateCommand),

    /// Print the load order or files of a root module
    Resolve(resolve::ResolveCommand),

    /// Export the module graph in Graphviz DOT format
    Graph(graph::GraphCommand),
}

impl Cli {
    /// Execute the parsed command with configuration derived from the flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
            quiet: self.quiet,
        }
    }

    /// Execute the parsed command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply_to_env();
        config.init_logging();

        match self.command {
            Commands::Inject(cmd) => cmd.execute(&config).await,
            Commands::Validate(cmd) => cmd.execute(&config).await,
            Commands::Resolve(cmd) => cmd.execute(&config).await,
            Commands::Graph(cmd) => cmd.execute(&config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_levels() {
        let cli = Cli::parse_from(["ngdeps", "validate"]);
        assert_eq!(cli.build_config().log_level.as_deref(), Some("warn"));

        let cli = Cli::parse_from(["ngdeps", "--verbose", "validate"]);
        assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

        let cli = Cli::parse_from(["ngdeps", "graph", "-q"]);
        let config = cli.build_config();
        assert_eq!(config.log_level, None);
        assert!(config.quiet);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ngdeps", "resolve", "app", "--config", "web/ngdeps.toml", "--no-progress"]);
        let config = cli.build_config();
        assert_eq!(config.config_path, Some(PathBuf::from("web/ngdeps.toml")));
        assert!(config.no_progress);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["ngdeps", "-v", "-q", "inject"]).is_err());
    }

    #[test]
    fn test_resolve_requires_module() {
        assert!(Cli::try_parse_from(["ngdeps", "resolve"]).is_err());
    }
}
