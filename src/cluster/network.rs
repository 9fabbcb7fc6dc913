//! Network and proxy cluster configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{ClusterResource, writable_asset};
use crate::asset::{AssetContext, AssetKind, Generate, Parents};
use crate::core::File;
use crate::installconfig::{ClusterNetworkEntry, InstallConfig, InstallConfigAsset};

const NETWORK_FILENAME: &str = "cluster-network-02-config.yml";
const PROXY_FILENAME: &str = "cluster-proxy-01-config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    pub cluster_network: Vec<ClusterNetworkEntry>,
    pub service_network: Vec<String>,
    pub network_type: String,
}

/// `networks.config.openshift.io/cluster`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Networking {
    pub config: ClusterResource<NetworkSpec>,
    files: Vec<File>,
}

writable_asset!(Networking, AssetKind::Networking);

impl Generate for Networking {
    const KIND: AssetKind = AssetKind::Networking;

    fn dependencies() -> Vec<AssetKind> {
        vec![AssetKind::InstallConfig]
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let networking = &parents.get::<InstallConfigAsset>()?.config.networking;
        let config = ClusterResource::cluster_config(
            "Network",
            NetworkSpec {
                cluster_network: networking.cluster_network.clone(),
                service_network: networking.service_network.clone(),
                network_type: networking.network_type.clone(),
            },
        );
        let files = vec![config.to_file(ctx.config.manifest_path(NETWORK_FILENAME))?];
        Ok(Self {
            config,
            files,
        })
    }
}

/// Proxy settings, used as both spec and status of the proxy resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub http_proxy: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub https_proxy: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub no_proxy: String,
}

/// `proxies.config.openshift.io/cluster`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    pub config: ClusterResource<ProxySettings, ProxySettings>,
    files: Vec<File>,
}

writable_asset!(Proxy, AssetKind::Proxy);

impl Generate for Proxy {
    const KIND: AssetKind = AssetKind::Proxy;

    fn dependencies() -> Vec<AssetKind> {
        vec![AssetKind::InstallConfig]
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let install_config = &parents.get::<InstallConfigAsset>()?.config;

        // The resource always exists; it stays empty when no proxy is set.
        let mut config = ClusterResource::cluster_config("Proxy", ProxySettings::default());
        if let Some(proxy) = &install_config.proxy {
            let spec = ProxySettings {
                http_proxy: proxy.http_proxy.clone(),
                https_proxy: proxy.https_proxy.clone(),
                no_proxy: proxy.no_proxy.clone(),
            };
            let status = ProxySettings {
                no_proxy: effective_no_proxy(install_config),
                ..spec.clone()
            };
            config.spec = spec;
            config.status = Some(status);
        }

        let files = vec![config.to_file(ctx.config.manifest_path(PROXY_FILENAME))?];
        Ok(Self {
            config,
            files,
        })
    }
}

/// The user's `noProxy` entries plus everything that must never be proxied
/// inside the cluster, sorted and de-duplicated.
fn effective_no_proxy(install_config: &InstallConfig) -> String {
    let networking = &install_config.networking;
    let mut entries: BTreeSet<String> = [".cluster.local", ".svc", "localhost", "127.0.0.1"]
        .into_iter()
        .map(String::from)
        .collect();

    entries.insert(format!("api-int.{}", install_config.cluster_domain()));
    entries.extend(networking.machine_network.iter().map(|n| n.cidr.clone()));
    entries.extend(networking.cluster_network.iter().map(|n| n.cidr.clone()));
    entries.extend(networking.service_network.iter().cloned());

    if let Some(proxy) = &install_config.proxy {
        entries.extend(
            proxy.no_proxy.split(',').map(str::trim).filter(|e| !e.is_empty()).map(String::from),
        );
    }

    entries.into_iter().collect::<Vec<_>>().join(",")
}
