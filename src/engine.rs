//! Library entry point for generating and loading manifests.
//!
//! [`ManifestEngine`] is what an outer driver calls: one engine per
//! invocation, holding the [`AssetContext`] every asset reads.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use kubeboot::asset::{Asset, AssetContext};
//! use kubeboot::config::EngineConfig;
//! use kubeboot::engine::{ManifestEngine, persist};
//! use kubeboot::installconfig::InstallConfigAsset;
//! use kubeboot::tls::DirectoryCertificateSource;
//!
//! # fn example() -> anyhow::Result<()> {
//! let install_config = InstallConfigAsset::from_yaml(&std::fs::read("install-config.yaml")?)?;
//! let ctx = AssetContext::new(EngineConfig::default(), Arc::new(DirectoryCertificateSource::new("tls")))
//!     .with_install_config(install_config.config);
//!
//! let manifests = ManifestEngine::new(ctx).generate()?;
//! persist(Path::new("assets"), manifests.files())?;
//! # Ok(())
//! # }
//! ```

use crate::asset::{AssetContext, AssetKind, Load};
use crate::core::ManifestError;
use crate::manifests::Manifests;
use crate::resolver::{self, ResolveMode, Resolved};
use crate::store::FileFetcher;

pub use crate::store::persist;

/// Generates or reloads the common manifests for one invocation.
#[derive(Debug, Clone)]
pub struct ManifestEngine {
    ctx: AssetContext,
}

impl ManifestEngine {
    pub fn new(ctx: AssetContext) -> Self {
        Self {
            ctx,
        }
    }

    pub fn context(&self) -> &AssetContext {
        &self.ctx
    }

    /// Resolve `requested` with their dependencies.
    pub fn resolve(
        &self,
        requested: &[AssetKind],
        mode: ResolveMode<'_>,
    ) -> Result<Resolved, ManifestError> {
        resolver::resolve(requested, &self.ctx, mode)
    }

    /// Generate the manifests from scratch.
    pub fn generate(&self) -> Result<Manifests, ManifestError> {
        self.manifests(ResolveMode::Generate)
    }

    /// Produce the manifests, reusing whatever `fetcher` already holds:
    /// assets present on disk are loaded, the rest are generated.
    pub fn generate_from(&self, fetcher: &dyn FileFetcher) -> Result<Manifests, ManifestError> {
        self.manifests(ResolveMode::Load(fetcher))
    }

    /// Load previously written manifests.
    ///
    /// Returns `Ok(None)` when the manifest directory is empty or has no
    /// control manifest.
    pub fn load(&self, fetcher: &dyn FileFetcher) -> Result<Option<Manifests>, ManifestError> {
        Manifests::load(fetcher, &self.ctx)
            .map_err(|e| ManifestError::from_asset_error(AssetKind::Manifests.name(), e))
    }

    /// Printable dependency tree of the manifests.
    pub fn dependency_tree(&self) -> Result<String, ManifestError> {
        let graph = resolver::build_graph(&[AssetKind::Manifests]);
        graph.detect_cycles()?;
        Ok(graph.to_tree_string(AssetKind::Manifests))
    }

    fn manifests(&self, mode: ResolveMode<'_>) -> Result<Manifests, ManifestError> {
        let mut resolved = self.resolve(&[AssetKind::Manifests], mode)?;
        tracing::info!("Resolved {} assets", resolved.computed().len());
        resolved.take::<Manifests>().ok_or_else(|| ManifestError::MissingDependency {
            asset: "manifest engine".to_string(),
            dependency: AssetKind::Manifests.name().to_string(),
        })
    }
}
