//! Ingress and DNS cluster configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ClusterResource, writable_asset};
use crate::asset::{AssetContext, AssetKind, Generate, Parents};
use crate::core::File;
use crate::installconfig::{ClusterId, InstallConfigAsset, PublishingStrategy};

const INGRESS_FILENAME: &str = "cluster-ingress-02-config.yml";
const DNS_FILENAME: &str = "cluster-dns-02-config.yml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressSpec {
    /// Default wildcard domain for application routes.
    pub domain: String,
}

/// `ingresses.config.openshift.io/cluster`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingress {
    pub config: ClusterResource<IngressSpec>,
    files: Vec<File>,
}

writable_asset!(Ingress, AssetKind::Ingress);

impl Generate for Ingress {
    const KIND: AssetKind = AssetKind::Ingress;

    fn dependencies() -> Vec<AssetKind> {
        vec![AssetKind::InstallConfig]
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let install_config = &parents.get::<InstallConfigAsset>()?.config;
        let config = ClusterResource::cluster_config(
            "Ingress",
            IngressSpec {
                domain: format!("apps.{}", install_config.cluster_domain()),
            },
        );
        let files = vec![config.to_file(ctx.config.manifest_path(INGRESS_FILENAME))?];
        Ok(Self {
            config,
            files,
        })
    }
}

/// A DNS zone, identified by ID or by tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsZone {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsSpec {
    pub base_domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_zone: Option<DnsZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_zone: Option<DnsZone>,
}

/// `dnses.config.openshift.io/cluster`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dns {
    pub config: ClusterResource<DnsSpec>,
    files: Vec<File>,
}

writable_asset!(Dns, AssetKind::Dns);

impl Generate for Dns {
    const KIND: AssetKind = AssetKind::Dns;

    fn dependencies() -> Vec<AssetKind> {
        vec![AssetKind::InstallConfig, AssetKind::ClusterId]
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let install_config = &parents.get::<InstallConfigAsset>()?.config;
        let cluster_id = parents.get::<ClusterId>()?;

        // Clusters on the None platform manage DNS themselves.
        let managed = install_config.platform.none.is_none();

        let public_zone = (managed && install_config.publish == PublishingStrategy::External)
            .then(|| DnsZone {
                id: install_config.base_domain.clone(),
                tags: BTreeMap::new(),
            });
        let private_zone = managed.then(|| DnsZone {
            id: String::new(),
            tags: BTreeMap::from([
                ("Name".to_string(), format!("{}-int", cluster_id.infra_id)),
                (format!("kubernetes.io/cluster/{}", cluster_id.infra_id), "owned".to_string()),
            ]),
        });

        let config = ClusterResource::cluster_config(
            "DNS",
            DnsSpec {
                base_domain: install_config.cluster_domain(),
                public_zone,
                private_zone,
            },
        );
        let files = vec![config.to_file(ctx.config.manifest_path(DNS_FILENAME))?];
        Ok(Self {
            config,
            files,
        })
    }
}
