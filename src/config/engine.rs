//! Engine configuration for kubeboot.
//!
//! [`EngineConfig`] holds every setting that would otherwise be process-wide
//! state: the manifest directory layout, the template suffix stripped from
//! output names, where on-disk template overrides live, and the ARO settings
//! fed into the bootkube template context. One value is built per
//! Generate/Load invocation and passed down explicitly.
//!
//! # File Format
//!
//! ```toml
//! manifest-dir = "manifests"
//! template-dir = "templates/bootkube"
//! template-suffix = ".template"
//! control-manifest = "cluster-config.yaml"
//!
//! [aro]
//! ingress-ip = "10.0.0.10"
//! image-registry-account-name = "clusterstorage"
//! image-registry-container-name = "image-registry"
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{ManifestError, join_path};

/// Default directory holding rendered manifests.
pub const DEFAULT_MANIFEST_DIR: &str = "manifests";

/// Default directory searched for template overrides.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates/bootkube";

/// Default suffix stripped from template file names.
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".template";

/// Default file name of the control manifest.
pub const DEFAULT_CONTROL_MANIFEST: &str = "cluster-config.yaml";

/// Layout and template settings for one Generate/Load invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Directory (relative to the asset root) holding manifests.
    pub manifest_dir: String,
    /// Directory (relative to the asset root) searched for template overrides.
    pub template_dir: String,
    /// Suffix stripped from template names when naming output files.
    pub template_suffix: String,
    /// File name of the control manifest inside `manifest_dir`.
    pub control_manifest: String,
    /// ARO-specific values exposed to the bootkube templates.
    pub aro: AroSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            manifest_dir: DEFAULT_MANIFEST_DIR.to_string(),
            template_dir: DEFAULT_TEMPLATE_DIR.to_string(),
            template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
            control_manifest: DEFAULT_CONTROL_MANIFEST.to_string(),
            aro: AroSettings::default(),
        }
    }
}

/// ARO settings consumed by the ARO collaborator assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AroSettings {
    /// IP address of the ingress load balancer; empty when not yet known.
    pub ingress_ip: String,
    /// Storage account backing the image registry.
    pub image_registry_account_name: String,
    /// Blob container backing the image registry.
    pub image_registry_container_name: String,
    /// HTTP secret for the image registry; generated when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_registry_http_secret: Option<String>,
}

impl Default for AroSettings {
    fn default() -> Self {
        Self {
            ingress_ip: String::new(),
            image_registry_account_name: String::new(),
            image_registry_container_name: "image-registry".to_string(),
            image_registry_http_secret: None,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ManifestError> {
        let config: Self = toml::from_str(content).map_err(|source| ManifestError::ConfigParse {
            file: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            pattern: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Check that directories are relative and stay inside the asset root.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (field, value) in
            [("manifest-dir", &self.manifest_dir), ("template-dir", &self.template_dir)]
        {
            if value.is_empty() {
                return Err(ManifestError::InvalidConfig {
                    reason: format!("{field} must not be empty"),
                });
            }
            if value.starts_with('/') || value.split('/').any(|part| part == "..") {
                return Err(ManifestError::InvalidConfig {
                    reason: format!("{field} must be a relative path inside the asset root: {value}"),
                });
            }
        }
        if self.control_manifest.is_empty() || self.control_manifest.contains('/') {
            return Err(ManifestError::InvalidConfig {
                reason: format!(
                    "control-manifest must be a plain file name: {}",
                    self.control_manifest
                ),
            });
        }
        Ok(())
    }

    /// Relative path of `name` inside the manifest directory.
    #[must_use]
    pub fn manifest_path(&self, name: &str) -> String {
        join_path(&self.manifest_dir, name)
    }

    /// Relative path of the control manifest.
    #[must_use]
    pub fn control_manifest_path(&self) -> String {
        self.manifest_path(&self.control_manifest)
    }

    /// Output name for a template file: its base name with the template
    /// suffix removed, placed in the manifest directory.
    #[must_use]
    pub fn rendered_name(&self, template_name: &str) -> String {
        let base = template_name.rsplit('/').next().unwrap_or(template_name);
        let base = base.strip_suffix(self.template_suffix.as_str()).unwrap_or(base);
        self.manifest_path(base)
    }
}
