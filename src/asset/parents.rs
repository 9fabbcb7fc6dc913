//! Typed access to an asset's resolved dependencies.

use std::collections::HashMap;

use super::{Asset, AssetKind, Generate};
use crate::bootkube::{BootkubeTemplate, TemplateKind};
use crate::core::ManifestError;
use crate::tls::{CertKey, CertKind};

/// The resolved dependencies visible to one asset while it generates.
///
/// Only dependencies the asset declared can be read; asking for anything
/// else is a [`ManifestError::MissingDependency`].
pub struct Parents<'a> {
    resolved: &'a HashMap<AssetKind, Box<dyn Asset>>,
    asset: AssetKind,
    declared: &'a [AssetKind],
}

impl<'a> Parents<'a> {
    pub(crate) fn new(
        resolved: &'a HashMap<AssetKind, Box<dyn Asset>>,
        asset: AssetKind,
        declared: &'a [AssetKind],
    ) -> Self {
        Self {
            resolved,
            asset,
            declared,
        }
    }

    fn missing(&self, dependency: AssetKind) -> ManifestError {
        ManifestError::MissingDependency {
            asset: self.asset.name().to_string(),
            dependency: dependency.name().to_string(),
        }
    }

    fn lookup(&self, kind: AssetKind) -> Result<&'a dyn Asset, ManifestError> {
        if !self.declared.contains(&kind) {
            return Err(self.missing(kind));
        }
        self.resolved.get(&kind).map(|asset| &**asset).ok_or_else(|| self.missing(kind))
    }

    /// The resolved value of dependency `T`.
    pub fn get<T: Generate>(&self) -> Result<&'a T, ManifestError> {
        self.lookup(T::KIND)?.as_any().downcast_ref::<T>().ok_or_else(|| self.missing(T::KIND))
    }

    /// A resolved certificate dependency.
    pub fn cert(&self, kind: CertKind) -> Result<&'a CertKey, ManifestError> {
        let asset = AssetKind::Cert(kind);
        self.lookup(asset)?.as_any().downcast_ref::<CertKey>().ok_or_else(|| self.missing(asset))
    }

    /// A resolved template dependency.
    pub fn template(&self, kind: TemplateKind) -> Result<&'a BootkubeTemplate, ManifestError> {
        let asset = AssetKind::Template(kind);
        self.lookup(asset)?
            .as_any()
            .downcast_ref::<BootkubeTemplate>()
            .ok_or_else(|| self.missing(asset))
    }

    /// The resolved dependency `kind` as a trait object.
    pub fn asset(&self, kind: AssetKind) -> Result<&'a dyn Asset, ManifestError> {
        self.lookup(kind)
    }
}
