//! Command-line interface for kubeboot.
//!
//! The binary is a thin driver around [`ManifestEngine`](crate::engine::ManifestEngine):
//!
//! - `generate` - produce the manifests for an asset directory and write them
//! - `load` - report the manifests previously written to an asset directory
//! - `graph` - print the asset dependency tree
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: no logging
//! - `--config` / `-c`: engine configuration file (TOML)
//!
//! Logging goes to stderr; `RUST_LOG` overrides the level chosen by the flags.

mod generate;
mod graph;
mod load;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the `kubeboot` target; `None` disables logging.
    pub log_level: Option<String>,
    /// Engine configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global tracing subscriber.
    pub fn init_logging(&self) {
        let Some(level) = &self.log_level else {
            return;
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("kubeboot={level}")));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load the engine configuration, or the defaults without `--config`.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        match &self.config_path {
            Some(path) => Ok(EngineConfig::from_file(path)?),
            None => Ok(EngineConfig::default()),
        }
    }
}

#[derive(Parser)]
#[command(
    name = "kubeboot",
    about = "Generate and load cluster bootstrap manifests",
    version,
    long_about = "kubeboot resolves the bootstrap asset graph (install config, cluster identity, \
                  certificates, cluster configuration) and renders the bootkube manifests into \
                  an asset directory."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all logging
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to an engine configuration file
    #[arg(short, long, global = true, env = "KUBEBOOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate manifests into an asset directory
    Generate(generate::GenerateCommand),

    /// Show manifests previously written to an asset directory
    Load(load::LoadCommand),

    /// Print the asset dependency tree
    Graph(graph::GraphCommand),
}

impl Cli {
    /// Run the selected command.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(&config)
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        let engine_config = config.engine_config()?;
        match self.command {
            Commands::Generate(cmd) => cmd.execute(engine_config),
            Commands::Load(cmd) => cmd.execute(engine_config),
            Commands::Graph(cmd) => cmd.execute(engine_config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_log_levels() {
        let cli = Cli::parse_from(["kubeboot", "graph"]);
        assert_eq!(cli.build_config().log_level.as_deref(), Some("info"));

        let cli = Cli::parse_from(["kubeboot", "--verbose", "graph"]);
        assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

        let cli = Cli::parse_from(["kubeboot", "graph", "-q"]);
        assert_eq!(cli.build_config().log_level, None);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["kubeboot", "-v", "-q", "graph"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let config = CliConfig {
            log_level: None,
            config_path: Some(PathBuf::from("/nonexistent/kubeboot.toml")),
        };
        assert!(config.engine_config().is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
