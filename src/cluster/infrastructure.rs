//! `infrastructures.config.openshift.io/cluster`

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{ClusterResource, writable_asset};
use crate::asset::{AssetContext, AssetKind, Generate, Parents};
use crate::core::File;
use crate::installconfig::{ClusterId, InstallConfigAsset};

const INFRASTRUCTURE_FILENAME: &str = "cluster-infrastructure-02-config.yml";

/// Port served by the Kubernetes API on both load balancers.
const API_PORT: u16 = 6443;

/// Empty spec: the infrastructure resource only carries status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureSpec {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureStatus {
    #[serde(rename = "infrastructureName")]
    pub infrastructure_name: String,
    pub platform: String,
    #[serde(rename = "apiServerURL")]
    pub api_server_url: String,
    #[serde(rename = "apiServerInternalURI")]
    pub api_server_internal_uri: String,
    #[serde(rename = "etcdDiscoveryDomain")]
    pub etcd_discovery_domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Infrastructure {
    pub config: ClusterResource<InfrastructureSpec, InfrastructureStatus>,
    files: Vec<File>,
}

writable_asset!(Infrastructure, AssetKind::Infrastructure);

impl Generate for Infrastructure {
    const KIND: AssetKind = AssetKind::Infrastructure;

    fn dependencies() -> Vec<AssetKind> {
        vec![AssetKind::InstallConfig, AssetKind::ClusterId]
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let install_config = &parents.get::<InstallConfigAsset>()?.config;
        let cluster_id = parents.get::<ClusterId>()?;
        let domain = install_config.cluster_domain();

        let status = InfrastructureStatus {
            infrastructure_name: cluster_id.infra_id.clone(),
            platform: install_config.platform.name().to_string(),
            api_server_url: format!("https://api.{domain}:{API_PORT}"),
            api_server_internal_uri: format!("https://api-int.{domain}:{API_PORT}"),
            etcd_discovery_domain: domain,
        };

        let config = ClusterResource::cluster_config("Infrastructure", InfrastructureSpec {})
            .with_status(status);
        let files = vec![config.to_file(ctx.config.manifest_path(INFRASTRUCTURE_FILENAME))?];
        Ok(Self {
            config,
            files,
        })
    }
}
