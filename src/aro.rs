//! ARO collaborator assets.
//!
//! These carry values the bootkube templates need on Azure Red Hat OpenShift
//! clusters. They are in-memory only: nothing is written and nothing is
//! loaded, so they are recomputed on every invocation. Every value is a
//! function of the settings and the cluster identity.

use anyhow::{Context, Result, bail};
use std::any::Any;
use std::net::IpAddr;
use uuid::Uuid;

use crate::asset::{Asset, AssetContext, AssetKind, Generate, Parents};
use crate::installconfig::ClusterId;

/// Name hashed under the cluster UUID to derive the default registry secret.
const HTTP_SECRET_NAME: &[u8] = b"image-registry-http-secret";

/// DNS settings for the ARO ingress load balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AroDnsConfig {
    /// Ingress load balancer IP, empty when not yet allocated.
    pub ingress_ip: String,
}

impl Asset for AroDnsConfig {
    fn kind(&self) -> AssetKind {
        AssetKind::AroDnsConfig
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Generate for AroDnsConfig {
    const KIND: AssetKind = AssetKind::AroDnsConfig;

    fn generate(_parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let ingress_ip = ctx.config.aro.ingress_ip.trim().to_string();
        if !ingress_ip.is_empty() {
            ingress_ip
                .parse::<IpAddr>()
                .with_context(|| format!("invalid ingress IP address {ingress_ip:?}"))?;
        }
        Ok(Self {
            ingress_ip,
        })
    }
}

/// Storage settings for the in-cluster image registry.
#[derive(Clone, PartialEq, Eq)]
pub struct AroImageRegistryConfig {
    pub http_secret: String,
    pub account_name: String,
    pub container_name: String,
}

impl std::fmt::Debug for AroImageRegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AroImageRegistryConfig")
            .field("http_secret", &"<redacted>")
            .field("account_name", &self.account_name)
            .field("container_name", &self.container_name)
            .finish()
    }
}

impl Asset for AroImageRegistryConfig {
    fn kind(&self) -> AssetKind {
        AssetKind::AroImageRegistryConfig
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Generate for AroImageRegistryConfig {
    const KIND: AssetKind = AssetKind::AroImageRegistryConfig;

    fn dependencies() -> Vec<AssetKind> {
        vec![AssetKind::ClusterId]
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let settings = &ctx.config.aro;
        if settings.image_registry_container_name.trim().is_empty() {
            bail!("image registry container name must not be empty");
        }

        let http_secret = match &settings.image_registry_http_secret {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => derived_http_secret(parents.get::<ClusterId>()?)?,
        };

        Ok(Self {
            http_secret,
            account_name: settings.image_registry_account_name.clone(),
            container_name: settings.image_registry_container_name.clone(),
        })
    }
}

/// Stable secret for a cluster: a name-based UUID under the cluster UUID.
fn derived_http_secret(cluster_id: &ClusterId) -> Result<String> {
    let namespace = Uuid::parse_str(&cluster_id.uuid)
        .with_context(|| format!("cluster UUID {:?} is not a valid UUID", cluster_id.uuid))?;
    Ok(Uuid::new_v5(&namespace, HTTP_SECRET_NAME).simple().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ParentsFixture, sample_context, sample_install_config};

    #[test]
    fn test_dns_config_accepts_empty_and_valid_ip() {
        let fixture = ParentsFixture::new(sample_install_config());
        let mut ctx = sample_context();
        assert_eq!(fixture.generate::<AroDnsConfig>(&ctx).unwrap().ingress_ip, "");

        ctx.config.aro.ingress_ip = "10.0.0.10".to_string();
        assert_eq!(fixture.generate::<AroDnsConfig>(&ctx).unwrap().ingress_ip, "10.0.0.10");
    }

    #[test]
    fn test_dns_config_rejects_bad_ip() {
        let mut ctx = sample_context();
        ctx.config.aro.ingress_ip = "not-an-ip".to_string();
        let err =
            ParentsFixture::new(sample_install_config()).generate::<AroDnsConfig>(&ctx).unwrap_err();
        assert!(err.to_string().contains("not-an-ip"));
    }

    #[test]
    fn test_registry_secret_from_settings_or_cluster_id() {
        let fixture = ParentsFixture::new(sample_install_config());
        let mut ctx = sample_context();

        let first = fixture.generate::<AroImageRegistryConfig>(&ctx).unwrap();
        let second = fixture.generate::<AroImageRegistryConfig>(&ctx).unwrap();
        assert_eq!(first.http_secret.len(), 32);
        assert_eq!(first.http_secret, second.http_secret);
        assert_eq!(first.container_name, "image-registry");

        ctx.config.aro.image_registry_http_secret = Some("s3cr3t".to_string());
        let fixed = fixture.generate::<AroImageRegistryConfig>(&ctx).unwrap();
        assert_eq!(fixed.http_secret, "s3cr3t");
        assert!(!format!("{fixed:?}").contains("s3cr3t"));
    }

    #[test]
    fn test_derived_secret_differs_per_cluster() {
        let a = ClusterId::from_uuid("test-cluster", Uuid::from_u128(1));
        let b = ClusterId::from_uuid("test-cluster", Uuid::from_u128(2));
        assert_eq!(derived_http_secret(&a).unwrap(), derived_http_secret(&a).unwrap());
        assert_ne!(derived_http_secret(&a).unwrap(), derived_http_secret(&b).unwrap());

        let broken = ClusterId {
            uuid: "not-a-uuid".to_string(),
            infra_id: "test-cluster-bcdfg".to_string(),
        };
        assert!(derived_http_secret(&broken).is_err());
    }
}
