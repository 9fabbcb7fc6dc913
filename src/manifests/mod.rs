//! The common manifests: the control manifest, every rendered bootkube
//! template, and the files of the cluster configuration assets.
//!
//! # Generate
//!
//! 1. Redact the install config and embed it in the `kube-system/cluster-config-v1`
//!    config map (the control manifest)
//! 2. Build one [`BootkubeTemplateData`] from certificates, identity and ARO values
//! 3. Render every bootkube template; the output name is the template's
//!    base name without the template suffix
//! 4. Append the files of the cluster configuration assets unchanged
//! 5. Sort everything by file name
//!
//! # Load
//!
//! Every `*.yaml`, `*.yml` and `*.json` file in the manifest directory is
//! fetched. The control manifest marks a completed Generate: without it the
//! directory is reported as not present, even if other manifests exist.

mod config_object;
mod registries;
mod template_data;

pub use config_object::ConfigurationObject;
pub use registries::{aro_worker_registries, registries_conf};
pub use template_data::BootkubeTemplateData;

use anyhow::Result;
use std::any::Any;
use std::collections::HashSet;
use tera::Context as TeraContext;

use crate::aro::{AroDnsConfig, AroImageRegistryConfig};
use crate::asset::{Asset, AssetContext, AssetKind, Generate, Load, Parents};
use crate::bootkube::TemplateKind;
use crate::core::{File, ManifestError, sort_files};
use crate::installconfig::{self, ClusterId, InstallConfigAsset, PublishingStrategy};
use crate::store::FileFetcher;
use crate::templating::TemplateRenderer;
use crate::tls::CertKind;
use template_data::{base64, pem_text};

/// Namespace of the control manifest.
pub const CONTROL_NAMESPACE: &str = "kube-system";

/// Name of the control manifest's config map.
pub const CONTROL_CONFIG_MAP: &str = "cluster-config-v1";

/// Key holding the redacted install config.
pub const INSTALL_CONFIG_KEY: &str = "install-config";

/// Extensions fetched by [`Manifests::load`].
const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Cluster configuration assets whose files are included verbatim.
const CLUSTER_CONFIG_ASSETS: [AssetKind; 7] = [
    AssetKind::Ingress,
    AssetKind::Dns,
    AssetKind::Networking,
    AssetKind::Infrastructure,
    AssetKind::Proxy,
    AssetKind::Scheduler,
    AssetKind::ImageContentSourcePolicy,
];

/// The assembled manifest set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifests {
    kube_sys_config: ConfigurationObject,
    file_list: Vec<File>,
}

impl Manifests {
    /// The parsed control manifest.
    pub fn kube_sys_config(&self) -> &ConfigurationObject {
        &self.kube_sys_config
    }

    /// The redacted install config embedded in the control manifest.
    pub fn install_config_yaml(&self) -> Option<&str> {
        self.kube_sys_config.data.get(INSTALL_CONFIG_KEY).map(String::as_str)
    }

    /// File names in output order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.file_list.iter().map(|f| f.filename.as_str())
    }

    fn template_data(parents: &Parents<'_>) -> Result<BootkubeTemplateData, ManifestError> {
        let install_config = &parents.get::<InstallConfigAsset>()?.config;
        let cluster_id = parents.get::<ClusterId>()?;
        let dns = parents.get::<AroDnsConfig>()?;
        let registry = parents.get::<AroImageRegistryConfig>()?;

        let etcd_signer = parents.cert(CertKind::EtcdSigner)?;
        let etcd_signer_client = parents.cert(CertKind::EtcdSignerClient)?;
        let etcd_metric_signer = parents.cert(CertKind::EtcdMetricSigner)?;
        let etcd_metric_signer_client = parents.cert(CertKind::EtcdMetricSignerClient)?;
        let mcs = parents.cert(CertKind::MachineConfigServer)?;

        Ok(BootkubeTemplateData {
            cvo_cluster_id: cluster_id.uuid.clone(),
            etcd_ca_bundle: pem_text(parents.cert(CertKind::EtcdCaBundle)?.cert()),
            etcd_metric_ca_cert: pem_text(parents.cert(CertKind::EtcdMetricCaBundle)?.cert()),
            etcd_metric_signer_cert: base64(etcd_metric_signer.cert()),
            etcd_metric_signer_client_cert: base64(etcd_metric_signer_client.cert()),
            etcd_metric_signer_client_key: base64(etcd_metric_signer_client.key()),
            etcd_metric_signer_key: base64(etcd_metric_signer.key()),
            etcd_signer_cert: base64(etcd_signer.cert()),
            etcd_signer_client_cert: base64(etcd_signer_client.cert()),
            etcd_signer_client_key: base64(etcd_signer_client.key()),
            etcd_signer_key: base64(etcd_signer.key()),
            mcs_tls_cert: base64(mcs.cert()),
            mcs_tls_key: base64(mcs.key()),
            pull_secret_base64: base64(&install_config.pull_secret),
            root_ca_cert: pem_text(parents.cert(CertKind::RootCa)?.cert()),
            aro_worker_registries: aro_worker_registries(&install_config.image_content_sources),
            aro_ingress_ip: dns.ingress_ip.clone(),
            aro_ingress_internal: install_config.publish == PublishingStrategy::Internal,
            aro_image_registry_http_secret: registry.http_secret.clone(),
            aro_image_registry_account_name: registry.account_name.clone(),
            aro_image_registry_container_name: registry.container_name.clone(),
            aro_cloud_name: install_config.azure_cloud_name().name().to_string(),
        })
    }

    fn render_bootkube(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Vec<File>, ManifestError> {
        let data = Self::template_data(parents)?;
        let context = TeraContext::from_serialize(&data)
            .map_err(|e| ManifestError::serialization("failed to build template context", e))?;
        let renderer = TemplateRenderer::new();

        let mut files = Vec::with_capacity(TemplateKind::ALL.len());
        for kind in TemplateKind::ALL {
            let template = parents.template(kind)?;
            for file in template.files() {
                let name = file.base_name();
                let rendered = renderer.render_bytes(name, &file.data, &context).map_err(|e| {
                    ManifestError::TemplateFault {
                        template: name.to_string(),
                        message: e.format_with_context(),
                    }
                })?;
                files.push(File::new(ctx.config.rendered_name(name), rendered));
            }
        }
        Ok(files)
    }
}

fn ensure_unique(files: &[File]) -> Result<(), ManifestError> {
    let mut seen = HashSet::with_capacity(files.len());
    for file in files {
        if !seen.insert(file.filename.as_str()) {
            return Err(ManifestError::DuplicateFile {
                filename: file.filename.clone(),
            });
        }
    }
    Ok(())
}

impl Asset for Manifests {
    fn kind(&self) -> AssetKind {
        AssetKind::Manifests
    }

    fn files(&self) -> &[File] {
        &self.file_list
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Generate for Manifests {
    const KIND: AssetKind = AssetKind::Manifests;

    fn dependencies() -> Vec<AssetKind> {
        let mut deps = vec![AssetKind::ClusterId, AssetKind::InstallConfig];
        deps.extend(CLUSTER_CONFIG_ASSETS);
        deps.extend(CertKind::ALL.map(AssetKind::Cert));
        deps.extend(TemplateKind::ALL.map(AssetKind::Template));
        deps.extend([AssetKind::AroDnsConfig, AssetKind::AroImageRegistryConfig]);
        deps
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let install_config = &parents.get::<InstallConfigAsset>()?.config;

        let redacted = installconfig::redact(install_config)?;
        let kube_sys_config = ConfigurationObject::config_map(
            CONTROL_NAMESPACE,
            CONTROL_CONFIG_MAP,
            [(INSTALL_CONFIG_KEY.to_string(), redacted)],
        );
        let control = serde_yaml::to_string(&kube_sys_config).map_err(|e| {
            ManifestError::serialization(
                format!("failed to create {CONTROL_NAMESPACE}/{CONTROL_CONFIG_MAP} configmap"),
                e,
            )
        })?;

        let mut file_list = vec![File::new(ctx.config.control_manifest_path(), control)];
        file_list.extend(Self::render_bootkube(parents, ctx)?);
        for kind in CLUSTER_CONFIG_ASSETS {
            file_list.extend(parents.asset(kind)?.files().iter().cloned());
        }

        ensure_unique(&file_list)?;
        sort_files(&mut file_list);
        tracing::debug!("Assembled {} manifests", file_list.len());

        Ok(Self {
            kube_sys_config,
            file_list,
        })
    }
}

impl Load for Manifests {
    fn load(fetcher: &dyn FileFetcher, ctx: &AssetContext) -> Result<Option<Self>> {
        let mut file_list = Vec::new();
        for ext in MANIFEST_EXTENSIONS {
            let pattern = ctx.config.manifest_path(&format!("*.{ext}"));
            file_list.extend(fetcher.fetch_by_pattern(&pattern)?);
        }
        if file_list.is_empty() {
            return Ok(None);
        }

        let control_path = ctx.config.control_manifest_path();
        let Some(control) = file_list.iter().find(|f| f.filename == control_path) else {
            tracing::debug!(
                "Found {} manifests but no {}; treating as not generated",
                file_list.len(),
                control_path
            );
            return Ok(None);
        };

        let kube_sys_config: ConfigurationObject = serde_yaml::from_slice(&control.data)
            .map_err(|e| ManifestError::serialization(format!("failed to unmarshal {control_path}"), e))?;

        sort_files(&mut file_list);
        Ok(Some(Self {
            kube_sys_config,
            file_list,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ResolveMode, resolve};
    use crate::store::MemoryFetcher;
    use crate::test_utils::{sample_context, sample_install_config};
    use crate::utils::dataurl;

    fn generate(ctx: &AssetContext) -> Manifests {
        resolve(&[AssetKind::Manifests], ctx, ResolveMode::Generate)
            .unwrap()
            .take::<Manifests>()
            .unwrap()
    }

    fn file<'a>(manifests: &'a Manifests, name: &str) -> &'a str {
        let file = manifests
            .files()
            .iter()
            .find(|f| f.filename == name)
            .unwrap_or_else(|| panic!("{name} not generated"));
        std::str::from_utf8(&file.data).unwrap()
    }

    #[test]
    fn test_generate_file_set() {
        let manifests = generate(&sample_context());
        let names: Vec<_> = manifests.file_names().collect();

        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);

        for expected in [
            "manifests/cluster-config.yaml",
            "manifests/cvo-overrides.yaml",
            "manifests/etcd-service.yaml",
            "manifests/04-openshift-machine-config-operator.yaml",
            "manifests/aro-worker-registries.yaml",
            "manifests/cluster-ingress-02-config.yml",
            "manifests/cluster-proxy-01-config.yaml",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert!(names.iter().all(|n| !n.ends_with(".template")));
        assert_eq!(names.len(), 1 + TemplateKind::ALL.len() + 6);
    }

    #[test]
    fn test_control_manifest_embeds_redacted_install_config() {
        let manifests = generate(&sample_context());
        let config = manifests.kube_sys_config();
        assert_eq!(config.metadata.namespace.as_deref(), Some("kube-system"));
        assert_eq!(config.metadata.name, "cluster-config-v1");

        let embedded = manifests.install_config_yaml().unwrap();
        assert!(embedded.contains("pullSecret: ''"));
        assert!(!embedded.contains("auths"));

        let control = file(&manifests, "manifests/cluster-config.yaml");
        let parsed: ConfigurationObject = serde_yaml::from_str(control).unwrap();
        assert_eq!(&parsed, config);
    }

    #[test]
    fn test_template_data_encoding() {
        let ctx = sample_context();
        let manifests = generate(&ctx);

        let cvo = file(&manifests, "manifests/cvo-overrides.yaml");
        assert!(cvo.contains(&ctx.cluster_id.unwrap().to_string()));

        let pull = file(&manifests, "manifests/openshift-config-secret-pull-secret.yaml");
        let pull_secret = &ctx.install_config.as_ref().unwrap().pull_secret;
        assert!(pull.contains(&base64(pull_secret)));

        // Multi-line PEM is indented into the YAML block scalar.
        let root_ca = file(&manifests, "manifests/kube-system-configmap-root-ca.yaml");
        assert!(root_ca.contains("\n    -----END CERTIFICATE-----"));

        let service = file(&manifests, "manifests/etcd-service.yaml");
        assert!(service.contains("9979"));
    }

    #[test]
    fn test_internal_publish_annotates_ingress_service() {
        let mut config = sample_install_config();
        config.publish = PublishingStrategy::Internal;
        let ctx = sample_context().with_install_config(config);
        let manifests = generate(&ctx);
        let service = file(&manifests, "manifests/aro-ingress-service.yaml");
        assert!(service.contains("azure-load-balancer-internal"));

        let external = generate(&sample_context());
        let service = file(&external, "manifests/aro-ingress-service.yaml");
        assert!(!service.contains("azure-load-balancer-internal"));
    }

    #[test]
    fn test_worker_registries_are_a_data_url() {
        let mut config = sample_install_config();
        config.image_content_sources = vec![installconfig::ImageContentSource {
            source: "registry.local".to_string(),
            mirrors: vec!["mirror1".to_string()],
        }];
        let ctx = sample_context().with_install_config(config.clone());
        let manifests = generate(&ctx);
        let registries = file(&manifests, "manifests/aro-worker-registries.yaml");
        let expected = dataurl::encode_text(registries_conf(&config.image_content_sources).as_bytes());
        assert!(registries.contains(&expected));
    }

    #[test]
    fn test_load_absent_when_empty() {
        let loaded = Manifests::load(&MemoryFetcher::new(), &sample_context()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_absent_without_control_manifest() {
        let fetcher: MemoryFetcher = [
            File::new("manifests/other.yaml", "kind: Other\n"),
            File::new("manifests/policy.json", "{}"),
        ]
        .into_iter()
        .collect();
        let loaded = Manifests::load(&fetcher, &sample_context()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_round_trip() {
        let manifests = generate(&sample_context());
        let mut fetcher: MemoryFetcher = manifests.files().iter().cloned().collect();
        fetcher.insert(File::new("manifests/notes.txt", "ignored"));
        fetcher.insert(File::new("tls/root-ca.crt", "ignored"));

        let loaded = Manifests::load(&fetcher, &sample_context()).unwrap().unwrap();
        assert_eq!(loaded, manifests);
    }

    #[test]
    fn test_load_rejects_malformed_control_manifest() {
        let fetcher: MemoryFetcher =
            [File::new("manifests/cluster-config.yaml", "data: [unclosed")].into_iter().collect();
        let err = Manifests::load(&fetcher, &sample_context()).unwrap_err();
        assert!(err.to_string().contains("failed to unmarshal manifests/cluster-config.yaml"));
    }

    #[test]
    fn test_duplicate_file_names_rejected() {
        let files = [File::new("manifests/a.yaml", "1"), File::new("manifests/a.yaml", "2")];
        assert!(matches!(
            ensure_unique(&files),
            Err(ManifestError::DuplicateFile { filename }) if filename == "manifests/a.yaml"
        ));
    }
}
