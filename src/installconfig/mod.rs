//! Install configuration: the user's description of the cluster, its
//! redaction, and the cluster identity derived from it.

mod cluster_id;
mod redact;
mod types;

pub use cluster_id::ClusterId;
pub use redact::{redact, redacted};
pub use types::{
    AzureCloudName, AzurePlatform, ClusterNetworkEntry, INSTALL_CONFIG_VERSION, ImageContentSource,
    InstallConfig, MachineNetworkEntry, MachinePool, Networking, NonePlatform, ObjectMeta, Platform,
    Proxy, PublishingStrategy, VSpherePlatform,
};

use anyhow::{Context, Result};
use std::any::Any;

use crate::asset::{Asset, AssetContext, AssetKind, Generate, Load, Parents};
use crate::core::File;
use crate::store::FileFetcher;

/// File name of the install config inside the asset directory.
pub const INSTALL_CONFIG_FILENAME: &str = "install-config.yaml";

/// The install config as an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfigAsset {
    pub config: InstallConfig,
    files: Vec<File>,
}

impl InstallConfigAsset {
    /// Validate `config` and wrap it.
    pub fn new(config: InstallConfig) -> Result<Self> {
        config.validate()?;
        let data = serde_yaml::to_string(&config).context("failed to marshal install-config")?;
        Ok(Self {
            config,
            files: vec![File::new(INSTALL_CONFIG_FILENAME, data)],
        })
    }

    /// Parse and validate YAML text.
    pub fn from_yaml(data: &[u8]) -> Result<Self> {
        let config: InstallConfig = serde_yaml::from_slice(data)
            .with_context(|| format!("failed to unmarshal {INSTALL_CONFIG_FILENAME}"))?;
        Self::new(config)
    }
}

impl Asset for InstallConfigAsset {
    fn kind(&self) -> AssetKind {
        AssetKind::InstallConfig
    }

    fn files(&self) -> &[File] {
        &self.files
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Generate for InstallConfigAsset {
    const KIND: AssetKind = AssetKind::InstallConfig;

    fn generate(_parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let config = ctx
            .install_config
            .clone()
            .context("no install config was provided and none was found on disk")?;
        Self::new(config)
    }
}

impl Load for InstallConfigAsset {
    fn load(fetcher: &dyn FileFetcher, _ctx: &AssetContext) -> Result<Option<Self>> {
        let Some(file) = fetcher.fetch_by_name(INSTALL_CONFIG_FILENAME)? else {
            return Ok(None);
        };
        Self::from_yaml(&file.data).map(Some)
    }
}
