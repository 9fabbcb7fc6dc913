//! Generate manifests into an asset directory.
//!
//! Assets already present in the directory (install config, certificates,
//! template overrides, previously written manifests) are loaded; everything
//! else is generated. The manifest files are then written back atomically.
//!
//! # Examples
//!
//! ```bash
//! kubeboot generate --dir ./assets --install-config install-config.yaml
//! kubeboot generate --dir ./assets --certs-dir /etc/pki/cluster --cluster-id 5f0a1c2e-7d3b-4c8a-9e61-2b4f8a7c3d10
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::asset::{Asset, AssetContext};
use crate::config::EngineConfig;
use crate::engine::{ManifestEngine, persist};
use crate::installconfig::InstallConfigAsset;
use crate::store::DirectoryFetcher;
use crate::tls::{DirectoryCertificateSource, TLS_DIR};

#[derive(Args)]
pub struct GenerateCommand {
    /// Asset directory to read from and write to
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Install config to use when the asset directory has no install-config.yaml
    #[arg(long)]
    install_config: Option<PathBuf>,

    /// Directory holding <name>.crt and <name>.key certificate material
    /// [default: <dir>/tls]
    #[arg(long)]
    certs_dir: Option<PathBuf>,

    /// Fixed cluster UUID instead of a random one
    #[arg(long)]
    cluster_id: Option<Uuid>,
}

impl GenerateCommand {
    pub fn execute(self, config: EngineConfig) -> Result<()> {
        let certs_dir = self.certs_dir.clone().unwrap_or_else(|| self.dir.join(TLS_DIR));
        let mut ctx = AssetContext::new(config, Arc::new(DirectoryCertificateSource::new(certs_dir)));

        if let Some(path) = &self.install_config {
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read install config {}", path.display()))?;
            ctx = ctx.with_install_config(InstallConfigAsset::from_yaml(&data)?.config);
        }
        if let Some(cluster_id) = self.cluster_id {
            ctx = ctx.with_cluster_id(cluster_id);
        }

        let fetcher = DirectoryFetcher::new(&self.dir);
        let manifests = ManifestEngine::new(ctx).generate_from(&fetcher)?;
        persist(&self.dir, manifests.files())?;

        println!(
            "{} Wrote {} manifests to {}",
            "✓".green(),
            manifests.files().len(),
            self.dir.display()
        );
        Ok(())
    }
}
