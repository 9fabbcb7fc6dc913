//! Per-invocation inputs shared by every asset.

use std::sync::Arc;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::installconfig::InstallConfig;
use crate::tls::CertificateSource;

/// Inputs for one Generate/Load invocation.
///
/// Assets read from the context but never write to it; everything an asset
/// computes flows through the resolver instead.
#[derive(Debug, Clone)]
pub struct AssetContext {
    /// Directory layout and ARO settings.
    pub config: EngineConfig,
    /// User-provided install configuration. Required to generate
    /// [`AssetKind::InstallConfig`](crate::asset::AssetKind::InstallConfig).
    pub install_config: Option<InstallConfig>,
    /// Fixed cluster UUID; a random one is generated when unset.
    pub cluster_id: Option<Uuid>,
    /// Provider of certificate material.
    pub certificates: Arc<dyn CertificateSource>,
}

impl AssetContext {
    pub fn new(config: EngineConfig, certificates: Arc<dyn CertificateSource>) -> Self {
        Self {
            config,
            install_config: None,
            cluster_id: None,
            certificates,
        }
    }

    #[must_use]
    pub fn with_install_config(mut self, install_config: InstallConfig) -> Self {
        self.install_config = Some(install_config);
        self
    }

    #[must_use]
    pub fn with_cluster_id(mut self, cluster_id: Uuid) -> Self {
        self.cluster_id = Some(cluster_id);
        self
    }
}
