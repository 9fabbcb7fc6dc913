//! Removing secrets from an install config before it is persisted.

use super::InstallConfig;
use crate::core::ManifestError;

/// A copy of `config` with secret-bearing fields cleared: the pull secret
/// always, and the vSphere username and password when vSphere is set.
/// Everything else is kept as is.
#[must_use]
pub fn redacted(config: &InstallConfig) -> InstallConfig {
    let mut config = config.clone();
    config.pull_secret.clear();
    if let Some(vsphere) = config.platform.vsphere.as_mut() {
        vsphere.username.clear();
        vsphere.password.clear();
    }
    config
}

/// Serialize the redacted form of `config` to YAML.
pub fn redact(config: &InstallConfig) -> Result<String, ManifestError> {
    serde_yaml::to_string(&redacted(config))
        .map_err(|e| ManifestError::serialization("failed to redact install-config", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installconfig::{InstallConfig, VSpherePlatform};
    use crate::test_utils::sample_install_config;

    fn vsphere_config() -> InstallConfig {
        let mut config = sample_install_config();
        config.platform.vsphere = Some(VSpherePlatform {
            vcenter: "vc.example.com".to_string(),
            username: "administrator".to_string(),
            password: "hunter2".to_string(),
            datacenter: "dc1".to_string(),
            default_datastore: "ds1".to_string(),
        });
        config
    }

    #[test]
    fn test_clears_secrets_only() {
        let original = vsphere_config();
        let clean = redacted(&original);

        assert!(clean.pull_secret.is_empty());
        let vsphere = clean.platform.vsphere.as_ref().unwrap();
        assert!(vsphere.username.is_empty());
        assert!(vsphere.password.is_empty());
        assert_eq!(vsphere.vcenter, "vc.example.com");
        assert_eq!(vsphere.default_datastore, "ds1");

        let mut expected = original.clone();
        expected.pull_secret.clear();
        expected.platform.vsphere.as_mut().unwrap().username.clear();
        expected.platform.vsphere.as_mut().unwrap().password.clear();
        assert_eq!(clean, expected);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let original = vsphere_config();
        let before = original.clone();
        let _ = redact(&original).unwrap();
        assert_eq!(original, before);
    }

    #[test]
    fn test_idempotent() {
        let original = vsphere_config();
        let once = redacted(&original);
        let twice = redacted(&once);
        assert_eq!(once, twice);
        assert_eq!(redact(&original).unwrap(), redact(&once).unwrap());
    }

    #[test]
    fn test_output_is_deterministic_yaml() {
        let config = sample_install_config();
        let a = redact(&config).unwrap();
        let b = redact(&config.clone()).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("pullSecret: ''"));

        let parsed: InstallConfig = serde_yaml::from_str(&a).unwrap();
        assert_eq!(parsed, redacted(&config));
    }
}
