//! `schedulers.config.openshift.io/cluster`

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{ClusterResource, writable_asset};
use crate::asset::{AssetContext, AssetKind, Generate, Parents};
use crate::core::File;
use crate::installconfig::InstallConfigAsset;

const SCHEDULER_FILENAME: &str = "cluster-scheduler-02-config.yml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerSpec {
    /// Control plane nodes accept regular workloads.
    pub masters_schedulable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    pub config: ClusterResource<SchedulerSpec>,
    files: Vec<File>,
}

writable_asset!(Scheduler, AssetKind::Scheduler);

impl Generate for Scheduler {
    const KIND: AssetKind = AssetKind::Scheduler;

    fn dependencies() -> Vec<AssetKind> {
        vec![AssetKind::InstallConfig]
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let install_config = &parents.get::<InstallConfigAsset>()?.config;

        // Without compute nodes the masters have to run workloads.
        let masters_schedulable = install_config.compute_replicas() == 0;
        if masters_schedulable {
            tracing::debug!("No compute replicas configured, control plane will be schedulable");
        }

        let config = ClusterResource::cluster_config(
            "Scheduler",
            SchedulerSpec {
                masters_schedulable,
            },
        );
        let files = vec![config.to_file(ctx.config.manifest_path(SCHEDULER_FILENAME))?];
        Ok(Self {
            config,
            files,
        })
    }
}
