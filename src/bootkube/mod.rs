//! Bootkube manifest templates.
//!
//! The templates are compiled into the binary. Each one is an asset whose
//! output is the raw template file; the manifest assembler renders them.
//! In load mode a file at `<template-dir>/<file name>` in the asset
//! directory replaces the bundled copy.

use anyhow::Result;
use std::any::Any;

use crate::asset::{Asset, AssetContext, AssetKind};
use crate::core::{File, join_path};
use crate::store::FileFetcher;

/// Identity of one bundled template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateKind {
    CvoOverrides,
    EtcdCaConfigMap,
    EtcdClientSecret,
    EtcdMetricClientSecret,
    EtcdMetricSignerSecret,
    EtcdMetricServingCaConfigMap,
    EtcdNamespace,
    EtcdService,
    EtcdServingCaConfigMap,
    EtcdSignerSecret,
    KubeCloudConfig,
    KubeSystemConfigmapRootCa,
    MachineConfigServerTlsSecret,
    OpenshiftConfigSecretPullSecret,
    OpenshiftMachineConfigOperator,
    KubevirtInfraNamespace,
    AroWorkerRegistries,
    AroIngressService,
    AroImageRegistry,
}

impl TemplateKind {
    /// All templates, in render order.
    pub const ALL: [TemplateKind; 19] = [
        TemplateKind::CvoOverrides,
        TemplateKind::EtcdCaConfigMap,
        TemplateKind::EtcdClientSecret,
        TemplateKind::EtcdMetricClientSecret,
        TemplateKind::EtcdMetricSignerSecret,
        TemplateKind::EtcdMetricServingCaConfigMap,
        TemplateKind::EtcdNamespace,
        TemplateKind::EtcdService,
        TemplateKind::EtcdServingCaConfigMap,
        TemplateKind::EtcdSignerSecret,
        TemplateKind::KubeCloudConfig,
        TemplateKind::KubeSystemConfigmapRootCa,
        TemplateKind::MachineConfigServerTlsSecret,
        TemplateKind::OpenshiftConfigSecretPullSecret,
        TemplateKind::OpenshiftMachineConfigOperator,
        TemplateKind::KubevirtInfraNamespace,
        TemplateKind::AroWorkerRegistries,
        TemplateKind::AroIngressService,
        TemplateKind::AroImageRegistry,
    ];

    /// Template file name.
    pub const fn file_name(self) -> &'static str {
        match self {
            TemplateKind::CvoOverrides => "cvo-overrides.yaml.template",
            TemplateKind::EtcdCaConfigMap => "etcd-ca-bundle-configmap.yaml.template",
            TemplateKind::EtcdClientSecret => "etcd-client-secret.yaml.template",
            TemplateKind::EtcdMetricClientSecret => "etcd-metric-client-secret.yaml.template",
            TemplateKind::EtcdMetricSignerSecret => "etcd-metric-signer-secret.yaml.template",
            TemplateKind::EtcdMetricServingCaConfigMap => {
                "etcd-metric-serving-ca-configmap.yaml.template"
            }
            TemplateKind::EtcdNamespace => "etcd-namespace.yaml.template",
            TemplateKind::EtcdService => "etcd-service.yaml",
            TemplateKind::EtcdServingCaConfigMap => "etcd-serving-ca-configmap.yaml.template",
            TemplateKind::EtcdSignerSecret => "etcd-signer-secret.yaml.template",
            TemplateKind::KubeCloudConfig => "kube-cloud-config.yaml",
            TemplateKind::KubeSystemConfigmapRootCa => "kube-system-configmap-root-ca.yaml.template",
            TemplateKind::MachineConfigServerTlsSecret => {
                "machine-config-server-tls-secret.yaml.template"
            }
            TemplateKind::OpenshiftConfigSecretPullSecret => {
                "openshift-config-secret-pull-secret.yaml.template"
            }
            TemplateKind::OpenshiftMachineConfigOperator => {
                "04-openshift-machine-config-operator.yaml"
            }
            TemplateKind::KubevirtInfraNamespace => "kubevirt-infra-namespace.yaml.template",
            TemplateKind::AroWorkerRegistries => "aro-worker-registries.yaml.template",
            TemplateKind::AroIngressService => "aro-ingress-service.yaml.template",
            TemplateKind::AroImageRegistry => "aro-image-registry.yaml.template",
        }
    }

    /// Human-readable asset name.
    pub const fn name(self) -> &'static str {
        match self {
            TemplateKind::CvoOverrides => "CVOOverrides",
            TemplateKind::EtcdCaConfigMap => "EtcdCAConfigMap",
            TemplateKind::EtcdClientSecret => "EtcdClientSecret",
            TemplateKind::EtcdMetricClientSecret => "EtcdMetricClientSecret",
            TemplateKind::EtcdMetricSignerSecret => "EtcdMetricSignerSecret",
            TemplateKind::EtcdMetricServingCaConfigMap => "EtcdMetricServingCAConfigMap",
            TemplateKind::EtcdNamespace => "EtcdNamespace",
            TemplateKind::EtcdService => "EtcdService",
            TemplateKind::EtcdServingCaConfigMap => "EtcdServingCAConfigMap",
            TemplateKind::EtcdSignerSecret => "EtcdSignerSecret",
            TemplateKind::KubeCloudConfig => "KubeCloudConfig",
            TemplateKind::KubeSystemConfigmapRootCa => "KubeSystemConfigmapRootCA",
            TemplateKind::MachineConfigServerTlsSecret => "MachineConfigServerTLSSecret",
            TemplateKind::OpenshiftConfigSecretPullSecret => "OpenshiftConfigSecretPullSecret",
            TemplateKind::OpenshiftMachineConfigOperator => "OpenshiftMachineConfigOperator",
            TemplateKind::KubevirtInfraNamespace => "KubevirtInfraNamespace",
            TemplateKind::AroWorkerRegistries => "AROWorkerRegistries",
            TemplateKind::AroIngressService => "AROIngressService",
            TemplateKind::AroImageRegistry => "AROImageRegistry",
        }
    }

    /// Bundled template text.
    pub const fn bundled(self) -> &'static str {
        match self {
            TemplateKind::CvoOverrides => include_str!("templates/cvo-overrides.yaml.template"),
            TemplateKind::EtcdCaConfigMap => {
                include_str!("templates/etcd-ca-bundle-configmap.yaml.template")
            }
            TemplateKind::EtcdClientSecret => include_str!("templates/etcd-client-secret.yaml.template"),
            TemplateKind::EtcdMetricClientSecret => {
                include_str!("templates/etcd-metric-client-secret.yaml.template")
            }
            TemplateKind::EtcdMetricSignerSecret => {
                include_str!("templates/etcd-metric-signer-secret.yaml.template")
            }
            TemplateKind::EtcdMetricServingCaConfigMap => {
                include_str!("templates/etcd-metric-serving-ca-configmap.yaml.template")
            }
            TemplateKind::EtcdNamespace => include_str!("templates/etcd-namespace.yaml.template"),
            TemplateKind::EtcdService => include_str!("templates/etcd-service.yaml"),
            TemplateKind::EtcdServingCaConfigMap => {
                include_str!("templates/etcd-serving-ca-configmap.yaml.template")
            }
            TemplateKind::EtcdSignerSecret => include_str!("templates/etcd-signer-secret.yaml.template"),
            TemplateKind::KubeCloudConfig => include_str!("templates/kube-cloud-config.yaml"),
            TemplateKind::KubeSystemConfigmapRootCa => {
                include_str!("templates/kube-system-configmap-root-ca.yaml.template")
            }
            TemplateKind::MachineConfigServerTlsSecret => {
                include_str!("templates/machine-config-server-tls-secret.yaml.template")
            }
            TemplateKind::OpenshiftConfigSecretPullSecret => {
                include_str!("templates/openshift-config-secret-pull-secret.yaml.template")
            }
            TemplateKind::OpenshiftMachineConfigOperator => {
                include_str!("templates/04-openshift-machine-config-operator.yaml")
            }
            TemplateKind::KubevirtInfraNamespace => {
                include_str!("templates/kubevirt-infra-namespace.yaml.template")
            }
            TemplateKind::AroWorkerRegistries => {
                include_str!("templates/aro-worker-registries.yaml.template")
            }
            TemplateKind::AroIngressService => include_str!("templates/aro-ingress-service.yaml.template"),
            TemplateKind::AroImageRegistry => include_str!("templates/aro-image-registry.yaml.template"),
        }
    }
}

/// A template asset: one unrendered template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootkubeTemplate {
    kind: TemplateKind,
    files: Vec<File>,
}

impl BootkubeTemplate {
    fn new(kind: TemplateKind, data: Vec<u8>, ctx: &AssetContext) -> Self {
        let filename = join_path(&ctx.config.template_dir, kind.file_name());
        Self {
            kind,
            files: vec![File::new(filename, data)],
        }
    }

    /// Which template this is.
    pub fn template_kind(&self) -> TemplateKind {
        self.kind
    }

    pub(crate) fn generate(kind: TemplateKind, ctx: &AssetContext) -> Self {
        Self::new(kind, kind.bundled().as_bytes().to_vec(), ctx)
    }

    pub(crate) fn load(
        kind: TemplateKind,
        fetcher: &dyn FileFetcher,
        ctx: &AssetContext,
    ) -> Result<Option<Self>> {
        let path = join_path(&ctx.config.template_dir, kind.file_name());
        let Some(file) = fetcher.fetch_by_name(&path)? else {
            return Ok(None);
        };
        tracing::info!("Using template override {}", file.filename);
        Ok(Some(Self::new(kind, file.data, ctx)))
    }
}

impl Asset for BootkubeTemplate {
    fn kind(&self) -> AssetKind {
        AssetKind::Template(self.kind)
    }

    fn files(&self) -> &[File] {
        &self.files
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
