//! Cluster-scoped configuration assets.
//!
//! Each asset derives one `config.openshift.io` resource (or, for image
//! content source policies, one file per mirrored source) from the install
//! config and writes it under the manifest directory. These assets are
//! always regenerated; they have no load path.

/// Implements [`Asset`](crate::asset::Asset) for a type with a `files` field.
macro_rules! writable_asset {
    ($ty:ty, $kind:expr) => {
        impl $crate::asset::Asset for $ty {
            fn kind(&self) -> $crate::asset::AssetKind {
                $kind
            }

            fn files(&self) -> &[$crate::core::File] {
                &self.files
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
                self
            }
        }
    };
}

pub(crate) use writable_asset;

mod icsp;
mod infrastructure;
mod ingress;
mod network;
mod resource;
mod scheduler;

pub use icsp::{ImageContentSourcePolicy, RepositoryDigestMirrors};
pub use infrastructure::{Infrastructure, InfrastructureStatus};
pub use ingress::{Dns, DnsSpec, DnsZone, Ingress, IngressSpec};
pub use network::{NetworkSpec, Networking, Proxy, ProxySettings};
pub use resource::{CONFIG_API_VERSION, ClusterResource, ResourceMeta};
pub use scheduler::{Scheduler, SchedulerSpec};
