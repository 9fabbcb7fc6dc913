//! Dispatch from [`AssetKind`] to the implementing type.

use anyhow::Result;

use super::{Asset, AssetContext, AssetKind, Generate, Load, Parents};
use crate::aro::{AroDnsConfig, AroImageRegistryConfig};
use crate::bootkube::BootkubeTemplate;
use crate::cluster::{Dns, ImageContentSourcePolicy, Infrastructure, Ingress, Networking, Proxy, Scheduler};
use crate::installconfig::{ClusterId, InstallConfigAsset};
use crate::manifests::Manifests;
use crate::store::FileFetcher;
use crate::tls::CertKey;

/// Declared dependencies of `kind`.
pub fn dependencies(kind: AssetKind) -> Vec<AssetKind> {
    match kind {
        AssetKind::ClusterId => ClusterId::dependencies(),
        AssetKind::InstallConfig => InstallConfigAsset::dependencies(),
        AssetKind::Ingress => Ingress::dependencies(),
        AssetKind::Dns => Dns::dependencies(),
        AssetKind::Infrastructure => Infrastructure::dependencies(),
        AssetKind::Networking => Networking::dependencies(),
        AssetKind::Proxy => Proxy::dependencies(),
        AssetKind::Scheduler => Scheduler::dependencies(),
        AssetKind::ImageContentSourcePolicy => ImageContentSourcePolicy::dependencies(),
        AssetKind::AroDnsConfig => AroDnsConfig::dependencies(),
        AssetKind::AroImageRegistryConfig => AroImageRegistryConfig::dependencies(),
        AssetKind::Cert(cert) => cert.dependencies(),
        AssetKind::Template(_) => Vec::new(),
        AssetKind::Manifests => Manifests::dependencies(),
    }
}

/// Generate `kind` from its resolved parents.
pub fn generate(kind: AssetKind, parents: &Parents<'_>, ctx: &AssetContext) -> Result<Box<dyn Asset>> {
    match kind {
        AssetKind::ClusterId => boxed(ClusterId::generate(parents, ctx)),
        AssetKind::InstallConfig => boxed(InstallConfigAsset::generate(parents, ctx)),
        AssetKind::Ingress => boxed(Ingress::generate(parents, ctx)),
        AssetKind::Dns => boxed(Dns::generate(parents, ctx)),
        AssetKind::Infrastructure => boxed(Infrastructure::generate(parents, ctx)),
        AssetKind::Networking => boxed(Networking::generate(parents, ctx)),
        AssetKind::Proxy => boxed(Proxy::generate(parents, ctx)),
        AssetKind::Scheduler => boxed(Scheduler::generate(parents, ctx)),
        AssetKind::ImageContentSourcePolicy => boxed(ImageContentSourcePolicy::generate(parents, ctx)),
        AssetKind::AroDnsConfig => boxed(AroDnsConfig::generate(parents, ctx)),
        AssetKind::AroImageRegistryConfig => boxed(AroImageRegistryConfig::generate(parents, ctx)),
        AssetKind::Cert(cert) => boxed(CertKey::generate(cert, parents, ctx)),
        AssetKind::Template(template) => boxed(Ok(BootkubeTemplate::generate(template, ctx))),
        AssetKind::Manifests => boxed(Manifests::generate(parents, ctx)),
    }
}

/// Load `kind` from disk. Kinds that are never persisted report `Ok(None)`.
pub fn load(kind: AssetKind, fetcher: &dyn FileFetcher, ctx: &AssetContext) -> Result<Option<Box<dyn Asset>>> {
    match kind {
        AssetKind::InstallConfig => boxed_opt(InstallConfigAsset::load(fetcher, ctx)),
        AssetKind::Cert(cert) => boxed_opt(CertKey::load(cert, fetcher, ctx)),
        AssetKind::Template(template) => boxed_opt(BootkubeTemplate::load(template, fetcher, ctx)),
        AssetKind::Manifests => boxed_opt(Manifests::load(fetcher, ctx)),
        AssetKind::ClusterId
        | AssetKind::Ingress
        | AssetKind::Dns
        | AssetKind::Infrastructure
        | AssetKind::Networking
        | AssetKind::Proxy
        | AssetKind::Scheduler
        | AssetKind::ImageContentSourcePolicy
        | AssetKind::AroDnsConfig
        | AssetKind::AroImageRegistryConfig => Ok(None),
    }
}

fn boxed<T: Asset>(asset: Result<T>) -> Result<Box<dyn Asset>> {
    asset.map(|a| Box::new(a) as Box<dyn Asset>)
}

fn boxed_opt<T: Asset>(asset: Result<Option<T>>) -> Result<Option<Box<dyn Asset>>> {
    asset.map(|a| a.map(|a| Box::new(a) as Box<dyn Asset>))
}
