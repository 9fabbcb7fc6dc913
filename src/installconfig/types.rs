//! The install configuration record.
//!
//! Field names follow the `install-config.yaml` format. Serialization keeps
//! declaration order, so the same value always produces the same bytes.

use serde::{Deserialize, Serialize};

use crate::core::ManifestError;

/// Current `apiVersion` of install configs.
pub const INSTALL_CONFIG_VERSION: &str = "v1";

fn default_api_version() -> String {
    INSTALL_CONFIG_VERSION.to_string()
}

/// User-provided description of the cluster to install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    pub metadata: ObjectMeta,
    pub base_domain: String,
    /// Registry credentials (a docker config JSON). Secret.
    #[serde(default)]
    pub pull_secret: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssh_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub additional_trust_bundle: String,
    #[serde(default)]
    pub publish: PublishingStrategy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_content_sources: Vec<ImageContentSource>,
    #[serde(default)]
    pub networking: Networking,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Proxy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane: Option<MachinePool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compute: Vec<MachinePool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
}

/// How the cluster's endpoints are exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishingStrategy {
    #[default]
    External,
    Internal,
}

/// A source repository and the mirrors that serve its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContentSource {
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mirrors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    pub network_type: String,
    pub cluster_network: Vec<ClusterNetworkEntry>,
    pub service_network: Vec<String>,
    pub machine_network: Vec<MachineNetworkEntry>,
}

impl Default for Networking {
    fn default() -> Self {
        Self {
            network_type: "OpenShiftSDN".to_string(),
            cluster_network: vec![ClusterNetworkEntry {
                cidr: "10.128.0.0/14".to_string(),
                host_prefix: 23,
            }],
            service_network: vec!["172.30.0.0/16".to_string()],
            machine_network: vec![MachineNetworkEntry {
                cidr: "10.0.0.0/16".to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkEntry {
    pub cidr: String,
    pub host_prefix: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineNetworkEntry {
    pub cidr: String,
}

/// Platform-specific configuration. At most one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzurePlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vsphere: Option<VSpherePlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub none: Option<NonePlatform>,
}

impl Platform {
    /// Platform type as reported in the infrastructure status.
    pub fn name(&self) -> &'static str {
        if self.azure.is_some() {
            "Azure"
        } else if self.vsphere.is_some() {
            "VSphere"
        } else {
            "None"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePlatform {
    pub region: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_domain_resource_group_name: String,
    #[serde(default)]
    pub cloud_name: AzureCloudName,
}

/// Azure cloud environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AzureCloudName {
    #[default]
    AzurePublicCloud,
    AzureUSGovernmentCloud,
    AzureChinaCloud,
    AzureGermanCloud,
}

impl AzureCloudName {
    pub const fn name(self) -> &'static str {
        match self {
            AzureCloudName::AzurePublicCloud => "AzurePublicCloud",
            AzureCloudName::AzureUSGovernmentCloud => "AzureUSGovernmentCloud",
            AzureCloudName::AzureChinaCloud => "AzureChinaCloud",
            AzureCloudName::AzureGermanCloud => "AzureGermanCloud",
        }
    }
}

/// vSphere platform. `username` and `password` are secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VSpherePlatform {
    #[serde(rename = "vCenter")]
    pub vcenter: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub datacenter: String,
    pub default_datastore: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonePlatform {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub http_proxy: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub https_proxy: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub no_proxy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachinePool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i64>,
}

impl InstallConfig {
    /// `<name>.<baseDomain>`
    pub fn cluster_domain(&self) -> String {
        format!("{}.{}", self.metadata.name, self.base_domain)
    }

    /// Total compute replicas; pools without a count default to 3.
    pub fn compute_replicas(&self) -> i64 {
        self.compute.iter().map(|pool| pool.replicas.unwrap_or(3)).sum()
    }

    /// Azure cloud name, defaulting to the public cloud off Azure.
    pub fn azure_cloud_name(&self) -> AzureCloudName {
        self.platform.azure.as_ref().map(|azure| azure.cloud_name).unwrap_or_default()
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let invalid = |reason: &str| {
            Err(ManifestError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.metadata.name.trim().is_empty() {
            return invalid("metadata.name must not be empty");
        }
        if self.base_domain.trim().is_empty() {
            return invalid("baseDomain must not be empty");
        }
        if self.pull_secret.trim().is_empty() {
            return invalid("pullSecret must not be empty");
        }
        for (i, source) in self.image_content_sources.iter().enumerate() {
            if source.source.trim().is_empty() {
                return Err(ManifestError::InvalidConfig {
                    reason: format!("imageContentSources[{i}].source must not be empty"),
                });
            }
        }
        let platforms = [
            self.platform.azure.is_some(),
            self.platform.vsphere.is_some(),
            self.platform.none.is_some(),
        ];
        if platforms.iter().filter(|set| **set).count() > 1 {
            return invalid("at most one platform may be configured");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
apiVersion: v1
metadata:
  name: test-cluster
baseDomain: example.com
pullSecret: '{"auths":{}}'
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config: InstallConfig = serde_yaml::from_str(MINIMAL).unwrap();
        assert_eq!(config.publish, PublishingStrategy::External);
        assert_eq!(config.networking.network_type, "OpenShiftSDN");
        assert_eq!(config.platform.name(), "None");
        assert_eq!(config.cluster_domain(), "test-cluster.example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config_parses() {
        let config: InstallConfig = serde_yaml::from_str(
            r#"
metadata:
  name: aro
baseDomain: example.com
pullSecret: abc
publish: Internal
imageContentSources:
- source: registry.local
  mirrors: [mirror1, mirror2]
platform:
  azure:
    region: eastus
    cloudName: AzureUSGovernmentCloud
compute:
- name: worker
  replicas: 0
"#,
        )
        .unwrap();
        assert_eq!(config.publish, PublishingStrategy::Internal);
        assert_eq!(config.image_content_sources[0].mirrors, vec!["mirror1", "mirror2"]);
        assert_eq!(config.azure_cloud_name().name(), "AzureUSGovernmentCloud");
        assert_eq!(config.compute_replicas(), 0);
    }

    #[test]
    fn test_vsphere_field_names() {
        let config: InstallConfig = serde_yaml::from_str(
            r#"
metadata: {name: c}
baseDomain: example.com
pullSecret: x
platform:
  vsphere:
    vCenter: vc.example.com
    username: admin
    password: hunter2
    datacenter: dc
    defaultDatastore: ds
"#,
        )
        .unwrap();
        let vsphere = config.platform.vsphere.as_ref().unwrap();
        assert_eq!(vsphere.vcenter, "vc.example.com");
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("vCenter: vc.example.com"));
        assert!(yaml.contains("defaultDatastore: ds"));
    }

    #[test]
    fn test_validation_failures() {
        let mut config: InstallConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.pull_secret.clear();
        assert!(matches!(config.validate(), Err(ManifestError::InvalidConfig { .. })));

        let mut config: InstallConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.metadata.name = " ".to_string();
        assert!(config.validate().is_err());

        let mut config: InstallConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.platform.none = Some(NonePlatform {});
        config.platform.azure = Some(AzurePlatform {
            region: "eastus".to_string(),
            base_domain_resource_group_name: String::new(),
            cloud_name: AzureCloudName::default(),
        });
        assert!(config.validate().is_err());
    }
}
