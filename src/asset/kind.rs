//! Asset identities.

use std::fmt;

use crate::bootkube::TemplateKind;
use crate::tls::CertKind;

/// Identity of an asset in the dependency graph.
///
/// Identity is by variant: within one resolution there is exactly one
/// instance per `AssetKind`. Certificates and templates are families of
/// assets parameterized by their own kind enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    ClusterId,
    InstallConfig,
    Ingress,
    Dns,
    Infrastructure,
    Networking,
    Proxy,
    Scheduler,
    ImageContentSourcePolicy,
    AroDnsConfig,
    AroImageRegistryConfig,
    Cert(CertKind),
    Template(TemplateKind),
    Manifests,
}

impl AssetKind {
    /// Human-readable name, used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            AssetKind::ClusterId => "Cluster ID",
            AssetKind::InstallConfig => "Install Config",
            AssetKind::Ingress => "Ingress Config",
            AssetKind::Dns => "DNS Config",
            AssetKind::Infrastructure => "Infrastructure Config",
            AssetKind::Networking => "Network Config",
            AssetKind::Proxy => "Proxy Config",
            AssetKind::Scheduler => "Scheduler Config",
            AssetKind::ImageContentSourcePolicy => "Image Content Source Policy",
            AssetKind::AroDnsConfig => "ARO DNS Config",
            AssetKind::AroImageRegistryConfig => "ARO Image Registry Config",
            AssetKind::Cert(cert) => cert.name(),
            AssetKind::Template(template) => template.name(),
            AssetKind::Manifests => "Common Manifests",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
