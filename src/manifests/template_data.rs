//! Values substituted into the bootkube templates.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

/// The flat render context shared by every bootkube template.
///
/// CA bundles and the root CA are inlined as PEM text; every other
/// certificate, key and the pull secret are base64-encoded for Secret data.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct BootkubeTemplateData {
    pub cvo_cluster_id: String,
    pub etcd_ca_bundle: String,
    pub etcd_metric_ca_cert: String,
    pub etcd_metric_signer_cert: String,
    pub etcd_metric_signer_client_cert: String,
    pub etcd_metric_signer_client_key: String,
    pub etcd_metric_signer_key: String,
    pub etcd_signer_cert: String,
    pub etcd_signer_client_cert: String,
    pub etcd_signer_client_key: String,
    pub etcd_signer_key: String,
    pub mcs_tls_cert: String,
    pub mcs_tls_key: String,
    pub pull_secret_base64: String,
    pub root_ca_cert: String,
    pub aro_worker_registries: String,
    pub aro_ingress_ip: String,
    pub aro_ingress_internal: bool,
    pub aro_image_registry_http_secret: String,
    pub aro_image_registry_account_name: String,
    pub aro_image_registry_container_name: String,
    pub aro_cloud_name: String,
}

impl std::fmt::Debug for BootkubeTemplateData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootkubeTemplateData")
            .field("cvo_cluster_id", &self.cvo_cluster_id)
            .field("aro_ingress_ip", &self.aro_ingress_ip)
            .field("aro_ingress_internal", &self.aro_ingress_internal)
            .field("aro_cloud_name", &self.aro_cloud_name)
            .finish_non_exhaustive()
    }
}

/// Standard base64 of `data`.
pub(crate) fn base64(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// PEM bytes as text; certificate material is ASCII.
pub(crate) fn pem_text(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_standard_alphabet() {
        assert_eq!(base64("abc"), "YWJj");
        assert_eq!(base64([0xfb, 0xff]), "+/8=");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let data = BootkubeTemplateData {
            cvo_cluster_id: "id".to_string(),
            etcd_ca_bundle: String::new(),
            etcd_metric_ca_cert: String::new(),
            etcd_metric_signer_cert: String::new(),
            etcd_metric_signer_client_cert: String::new(),
            etcd_metric_signer_client_key: String::new(),
            etcd_metric_signer_key: "c2VjcmV0".to_string(),
            etcd_signer_cert: String::new(),
            etcd_signer_client_cert: String::new(),
            etcd_signer_client_key: String::new(),
            etcd_signer_key: String::new(),
            mcs_tls_cert: String::new(),
            mcs_tls_key: String::new(),
            pull_secret_base64: "cHVsbA==".to_string(),
            root_ca_cert: String::new(),
            aro_worker_registries: String::new(),
            aro_ingress_ip: String::new(),
            aro_ingress_internal: false,
            aro_image_registry_http_secret: String::new(),
            aro_image_registry_account_name: String::new(),
            aro_image_registry_container_name: String::new(),
            aro_cloud_name: "AzurePublicCloud".to_string(),
        };
        let debug = format!("{data:?}");
        assert!(debug.contains("AzurePublicCloud"));
        assert!(!debug.contains("c2VjcmV0"));
        assert!(!debug.contains("cHVsbA=="));
    }
}
