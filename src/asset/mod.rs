//! The asset model.
//!
//! An asset is one node of the dependency graph: it declares which other
//! assets it needs, computes its own value from them, and may expose files.
//! Assets are identified by [`AssetKind`]; the resolver computes each kind at
//! most once per invocation and hands dependents a shared reference through
//! [`Parents`].
//!
//! # Traits
//!
//! - [`Asset`]: object-safe view used by the resolver (identity, files,
//!   downcasting)
//! - [`Generate`]: singleton assets whose identity is their Rust type
//! - [`Load`]: assets that can be reconstructed from previously written files
//!
//! Certificate and template assets are families keyed by
//! [`CertKind`](crate::tls::CertKind) and
//! [`TemplateKind`](crate::bootkube::TemplateKind); [`registry`] dispatches
//! them by kind.
//!
//! # Example
//!
//! ```rust,ignore
//! impl Generate for Ingress {
//!     const KIND: AssetKind = AssetKind::Ingress;
//!
//!     fn dependencies() -> Vec<AssetKind> {
//!         vec![AssetKind::InstallConfig]
//!     }
//!
//!     fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> anyhow::Result<Self> {
//!         let install_config = parents.get::<InstallConfigAsset>()?;
//!         // ...
//!     }
//! }
//! ```

mod context;
mod kind;
mod parents;
pub mod registry;

pub use context::AssetContext;
pub use kind::AssetKind;
pub use parents::Parents;

use std::any::Any;
use std::fmt;

use crate::core::File;
use crate::store::FileFetcher;

/// Object-safe view of a computed asset.
pub trait Asset: fmt::Debug + Send + Sync + 'static {
    /// Identity of this asset.
    fn kind(&self) -> AssetKind;

    /// Files this asset writes. Empty for purely in-memory assets.
    fn files(&self) -> &[File] {
        &[]
    }

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// An asset computed from its declared dependencies.
pub trait Generate: Asset + Sized {
    /// Identity of the type.
    const KIND: AssetKind;

    /// Assets that must be resolved before this one, in declaration order.
    fn dependencies() -> Vec<AssetKind> {
        Vec::new()
    }

    /// Compute the asset from resolved dependencies.
    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> anyhow::Result<Self>;
}

/// An asset that can be reconstructed from files on disk.
pub trait Load: Generate {
    /// Returns `Ok(None)` when the asset is not present, so callers can
    /// fall back to [`Generate::generate`].
    fn load(fetcher: &dyn FileFetcher, ctx: &AssetContext) -> anyhow::Result<Option<Self>>;
}
