//! Generate, persist and Load through real asset directories.

use std::collections::BTreeSet;
use std::error::Error;
use std::sync::Arc;
use tempfile::TempDir;

use kubeboot::asset::{Asset, AssetContext, AssetKind};
use kubeboot::config::EngineConfig;
use kubeboot::engine::{ManifestEngine, persist};
use kubeboot::installconfig::{ImageContentSource, PublishingStrategy};
use kubeboot::manifests::{ConfigurationObject, Manifests};
use kubeboot::resolver::ResolveMode;
use kubeboot::store::DirectoryFetcher;
use kubeboot::test_utils::{init_test_logging, sample_context, sample_install_config};
use kubeboot::tls::{CertKind, DirectoryCertificateSource};

use super::{decode_data_url, write_certificates, write_install_config};

fn file_text<'a>(manifests: &'a Manifests, name: &str) -> &'a str {
    let file = manifests
        .files()
        .iter()
        .find(|f| f.filename == name)
        .unwrap_or_else(|| panic!("{name} missing"));
    std::str::from_utf8(&file.data).unwrap()
}

#[test]
fn test_generate_persist_load_round_trip() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let engine = ManifestEngine::new(sample_context());

    let generated = engine.generate().unwrap();
    persist(temp.path(), generated.files()).unwrap();

    let loaded = engine.load(&DirectoryFetcher::new(temp.path())).unwrap().unwrap();
    assert_eq!(loaded.kube_sys_config(), generated.kube_sys_config());
    assert_eq!(loaded.install_config_yaml(), generated.install_config_yaml());

    let generated_names: BTreeSet<_> = generated.file_names().collect();
    let loaded_names: BTreeSet<_> = loaded.file_names().collect();
    assert_eq!(generated_names, loaded_names);
    assert_eq!(loaded.file_names().collect::<Vec<_>>(), generated.file_names().collect::<Vec<_>>());
}

#[test]
fn test_generate_is_byte_identical_across_runs() {
    let first = ManifestEngine::new(sample_context()).generate().unwrap();
    let second = ManifestEngine::new(sample_context()).generate().unwrap();
    assert_eq!(first.files(), second.files());
}

#[test]
fn test_end_to_end_internal_cluster_with_mirrors() {
    let mut config = sample_install_config();
    config.pull_secret = "abc".to_string();
    config.publish = PublishingStrategy::Internal;
    config.image_content_sources = vec![ImageContentSource {
        source: "registry.local".to_string(),
        mirrors: vec!["mirror1".to_string(), "mirror2".to_string()],
    }];
    let original = config.clone();
    let ctx = sample_context().with_install_config(config);

    let manifests = ManifestEngine::new(ctx.clone()).generate().unwrap();

    // The caller's install config is untouched.
    assert_eq!(ctx.install_config.as_ref(), Some(&original));

    let control = file_text(&manifests, "manifests/cluster-config.yaml");
    let control: ConfigurationObject = serde_yaml::from_str(control).unwrap();
    let embedded = &control.data["install-config"];
    assert!(embedded.contains("pullSecret: ''"), "{embedded}");
    assert!(embedded.contains("publish: Internal"));

    let registries = file_text(&manifests, "manifests/aro-worker-registries.yaml");
    let url = registries
        .lines()
        .find_map(|line| line.trim().strip_prefix("source: '"))
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap();
    assert!(!url.contains(' '));

    let conf = decode_data_url(url);
    assert_eq!(conf.matches("[[registry]]").count(), 1);
    assert_eq!(conf.matches("[[registry.mirror]]").count(), 2);
    assert!(conf.contains("location = \"registry.local\""));
    assert!(conf.contains("location = \"mirror1\""));
    assert!(conf.contains("location = \"mirror2\""));

    let icsp = file_text(&manifests, "manifests/image-content-source-policy-0.yaml");
    assert!(icsp.contains("source: registry.local"));
}

#[test]
fn test_load_empty_directory_is_not_present() {
    let temp = TempDir::new().unwrap();
    let engine = ManifestEngine::new(sample_context());
    assert!(engine.load(&DirectoryFetcher::new(temp.path())).unwrap().is_none());

    std::fs::create_dir(temp.path().join("manifests")).unwrap();
    assert!(engine.load(&DirectoryFetcher::new(temp.path())).unwrap().is_none());
}

#[test]
fn test_load_without_control_manifest_is_not_present() {
    let temp = TempDir::new().unwrap();
    let manifests = temp.path().join("manifests");
    std::fs::create_dir(&manifests).unwrap();
    std::fs::write(manifests.join("unrelated.yaml"), "kind: Unrelated\n").unwrap();
    std::fs::write(manifests.join("other.json"), "{}").unwrap();

    let engine = ManifestEngine::new(sample_context());
    assert!(engine.load(&DirectoryFetcher::new(temp.path())).unwrap().is_none());
}

#[test]
fn test_load_unreadable_manifest_directory_is_an_error() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("manifests"), "not a directory").unwrap();

    let err = ManifestEngine::new(sample_context())
        .load(&DirectoryFetcher::new(temp.path()))
        .unwrap_err();
    assert!(!err.is_fatal());
    let cause = err.source().unwrap().to_string();
    assert!(cause.contains("manifests/*.yaml"), "{cause}");
}

#[test]
fn test_load_ignores_case_mismatched_extensions() {
    let temp = TempDir::new().unwrap();
    let generated = ManifestEngine::new(sample_context()).generate().unwrap();
    persist(temp.path(), generated.files()).unwrap();
    std::fs::write(temp.path().join("manifests/EXTRA.YAML"), "kind: Extra\n").unwrap();

    let loaded = ManifestEngine::new(sample_context())
        .load(&DirectoryFetcher::new(temp.path()))
        .unwrap()
        .unwrap();
    assert!(loaded.file_names().all(|name| name != "manifests/EXTRA.YAML"));
}

#[test]
fn test_generate_from_directory_loads_inputs() {
    let temp = TempDir::new().unwrap();
    write_install_config(temp.path(), sample_install_config());
    write_certificates(temp.path());

    // Nothing in the context: install config and certificates come from disk.
    let empty_certs = TempDir::new().unwrap();
    let ctx = AssetContext::new(
        EngineConfig::default(),
        Arc::new(DirectoryCertificateSource::new(empty_certs.path())),
    );
    let engine = ManifestEngine::new(ctx);
    let fetcher = DirectoryFetcher::new(temp.path());

    let resolved = engine.resolve(&[AssetKind::Manifests], ResolveMode::Load(&fetcher)).unwrap();
    assert!(resolved.was_loaded(AssetKind::InstallConfig));
    assert!(resolved.was_loaded(AssetKind::Cert(CertKind::RootCa)));
    assert!(!resolved.was_loaded(AssetKind::Cert(CertKind::EtcdCaBundle)));
    assert!(!resolved.was_loaded(AssetKind::Manifests));
}

#[test]
fn test_template_override_from_directory() {
    let temp = TempDir::new().unwrap();
    let template_dir = temp.path().join("templates/bootkube");
    std::fs::create_dir_all(&template_dir).unwrap();
    std::fs::write(
        template_dir.join("etcd-namespace.yaml.template"),
        "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: openshift-etcd\n  labels:\n    cluster: \"{{ cvo_cluster_id }}\"\n",
    )
    .unwrap();

    let ctx = sample_context();
    let cluster_id = ctx.cluster_id.unwrap().to_string();
    let manifests =
        ManifestEngine::new(ctx).generate_from(&DirectoryFetcher::new(temp.path())).unwrap();

    let namespace = file_text(&manifests, "manifests/etcd-namespace.yaml");
    assert!(namespace.contains(&format!("cluster: \"{cluster_id}\"")));
}
