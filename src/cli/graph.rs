//! Print the asset dependency tree.
//!
//! ```text
//! └── Common Manifests
//!     ├── Cluster ID
//!     │   └── Install Config
//!     ├── Install Config
//!     ...
//! ```
//!
//! Assets reached more than once are listed each time but expanded only on
//! first occurrence.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;

use crate::asset::AssetContext;
use crate::config::EngineConfig;
use crate::engine::ManifestEngine;
use crate::tls::StaticCertificateSource;

#[derive(Args)]
pub struct GraphCommand {}

impl GraphCommand {
    pub fn execute(self, config: EngineConfig) -> Result<()> {
        let ctx = AssetContext::new(config, Arc::new(StaticCertificateSource::new()));
        print!("{}", ManifestEngine::new(ctx).dependency_tree()?);
        Ok(())
    }
}
