//! Shape shared by the cluster-scoped config resources.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::File;

/// `config.openshift.io` API group version.
pub const CONFIG_API_VERSION: &str = "config.openshift.io/v1";

/// Object metadata written into manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ResourceMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }
}

/// A Kubernetes-style resource with a typed spec and optional status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResource<S, T = ()> {
    pub api_version: String,
    pub kind: String,
    pub metadata: ResourceMeta,
    pub spec: S,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<T>,
}

impl<S: Serialize, T: Serialize> ClusterResource<S, T> {
    /// A cluster-scoped `config.openshift.io/v1` singleton named `cluster`.
    pub fn cluster_config(kind: &str, spec: S) -> Self {
        Self {
            api_version: CONFIG_API_VERSION.to_string(),
            kind: kind.to_string(),
            metadata: ResourceMeta::named("cluster"),
            spec,
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: T) -> Self {
        self.status = Some(status);
        self
    }

    /// Serialize to YAML as a file at `filename`.
    pub fn to_file(&self, filename: String) -> Result<File> {
        let data = serde_yaml::to_string(self)
            .with_context(|| format!("failed to create {} manifest", self.kind))?;
        Ok(File::new(filename, data))
    }
}
