//! Show manifests previously written to an asset directory.
//!
//! # Examples
//!
//! ```bash
//! kubeboot load --dir ./assets
//! kubeboot load --dir ./assets --format json
//! kubeboot load --dir ./assets --show-install-config
//! ```

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use crate::asset::AssetContext;
use crate::config::EngineConfig;
use crate::engine::ManifestEngine;
use crate::store::DirectoryFetcher;
use crate::tls::StaticCertificateSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
pub struct LoadCommand {
    /// Asset directory to read
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also print the redacted install config from the control manifest
    #[arg(long)]
    show_install_config: bool,
}

impl LoadCommand {
    pub fn execute(self, config: EngineConfig) -> Result<()> {
        // Loading manifests never touches certificate material.
        let ctx = AssetContext::new(config, Arc::new(StaticCertificateSource::new()));
        let fetcher = DirectoryFetcher::new(&self.dir);
        let loaded = ManifestEngine::new(ctx).load(&fetcher)?;

        match (self.format, loaded) {
            (OutputFormat::Json, loaded) => {
                let files: Vec<&str> =
                    loaded.as_ref().map(|m| m.file_names().collect()).unwrap_or_default();
                let output = json!({
                    "found": loaded.is_some(),
                    "files": files,
                    "installConfig": loaded.as_ref().and_then(|m| m.install_config_yaml()),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            (OutputFormat::Text, None) => {
                println!("No manifests found in {}", self.dir.display());
            }
            (OutputFormat::Text, Some(manifests)) => {
                println!("{} Manifests in {}:", "✓".green(), self.dir.display());
                for name in manifests.file_names() {
                    println!("  {name}");
                }
                if self.show_install_config
                    && let Some(install_config) = manifests.install_config_yaml()
                {
                    println!("\n{}", "Install config (redacted):".bold());
                    print!("{install_config}");
                }
            }
        }
        Ok(())
    }
}
