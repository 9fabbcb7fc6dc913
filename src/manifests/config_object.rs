//! The control manifest shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cluster::ResourceMeta;

/// A `v1/ConfigMap` carrying opaque string data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationObject {
    pub api_version: String,
    pub kind: String,
    pub metadata: ResourceMeta,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl ConfigurationObject {
    /// A config map in `namespace` named `name` holding `data`.
    pub fn config_map(
        namespace: &str,
        name: &str,
        data: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "ConfigMap".to_string(),
            metadata: ResourceMeta::namespaced(namespace, name),
            data: data.into_iter().collect(),
        }
    }
}
