//! Integration tests for the `kubeboot` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use kubeboot::test_utils::{SAMPLE_CLUSTER_ID, sample_install_config};

use super::{write_certificates, write_install_config};

fn kubeboot() -> Command {
    let mut cmd = Command::cargo_bin("kubeboot").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("KUBEBOOT_CONFIG");
    cmd
}

fn prepared_asset_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_install_config(temp.path(), sample_install_config());
    write_certificates(temp.path());
    temp
}

#[test]
fn test_graph_prints_tree() {
    kubeboot()
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("└── Common Manifests"))
        .stdout(predicate::str::contains("Root CA"))
        .stdout(predicate::str::contains("CVOOverrides"));
}

#[test]
fn test_load_empty_directory() {
    let temp = TempDir::new().unwrap();
    kubeboot()
        .args(["load", "--dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No manifests found"));
}

#[test]
fn test_generate_then_load() {
    let temp = prepared_asset_dir();

    kubeboot()
        .args(["--quiet", "generate", "--cluster-id", &SAMPLE_CLUSTER_ID.to_string(), "--dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    assert!(temp.path().join("manifests/cluster-config.yaml").is_file());
    assert!(temp.path().join("manifests/cvo-overrides.yaml").is_file());
    assert!(!temp.path().join("manifests/cvo-overrides.yaml.template").exists());

    kubeboot()
        .args(["load", "--show-install-config", "--dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("manifests/cluster-config.yaml"))
        .stdout(predicate::str::contains("pullSecret: ''"));

    kubeboot()
        .args(["load", "--format", "json", "--dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"found\": true"));
}

#[test]
fn test_generate_is_repeatable() {
    let temp = prepared_asset_dir();
    let run = || {
        kubeboot().args(["-q", "generate", "--dir"]).arg(temp.path()).assert().success();
        std::fs::read(temp.path().join("manifests/cluster-config.yaml")).unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
}

#[test]
fn test_generate_with_explicit_install_config() {
    let temp = TempDir::new().unwrap();
    write_certificates(temp.path());
    let inputs = TempDir::new().unwrap();
    write_install_config(inputs.path(), sample_install_config());

    kubeboot()
        .args(["-q", "generate", "--install-config"])
        .arg(inputs.path().join("install-config.yaml"))
        .arg("--dir")
        .arg(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("manifests/cluster-config.yaml").is_file());
}

#[test]
fn test_generate_without_install_config_fails() {
    let temp = TempDir::new().unwrap();
    write_certificates(temp.path());

    kubeboot()
        .args(["-q", "generate", "--dir"])
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Install Config"));

    assert!(!temp.path().join("manifests").exists());
}

#[test]
fn test_defective_template_override_exits_fatally() {
    let temp = prepared_asset_dir();
    let template_dir = temp.path().join("templates/bootkube");
    std::fs::create_dir_all(&template_dir).unwrap();
    std::fs::write(template_dir.join("etcd-service.yaml"), "apiVersion: v1\nport: {{ add(a=1 }}\n")
        .unwrap();

    kubeboot()
        .args(["-q", "generate", "--dir"])
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("etcd-service.yaml"));
}

#[test]
fn test_invalid_engine_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("kubeboot.toml");
    std::fs::write(&config, "manifest-dir = \"../escape\"\n").unwrap();

    kubeboot()
        .arg("--config")
        .arg(&config)
        .arg("graph")
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest-dir"));
}

#[test]
fn test_custom_manifest_dir_from_config() {
    let temp = prepared_asset_dir();
    let config = temp.path().join("kubeboot.toml");
    std::fs::write(&config, "manifest-dir = \"openshift\"\n").unwrap();

    kubeboot()
        .args(["-q", "--config"])
        .arg(&config)
        .args(["generate", "--dir"])
        .arg(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("openshift/cluster-config.yaml").is_file());
}
