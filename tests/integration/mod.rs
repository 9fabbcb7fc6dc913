//! Integration test suite for kubeboot
//!
//! End-to-end tests for the manifest engine and the `kubeboot` binary. They
//! work on temporary asset directories and need no network access.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **generate_load**: Generate, persist and Load through real directories
//! - **cli**: the `generate`, `load` and `graph` commands

mod cli;
mod generate_load;

use std::path::Path;

use kubeboot::asset::Asset;
use kubeboot::core::File;
use kubeboot::engine::persist;
use kubeboot::installconfig::{InstallConfig, InstallConfigAsset};
use kubeboot::test_utils::{test_cert, test_key};
use kubeboot::tls::{CertKind, TLS_DIR};

/// Write `install-config.yaml` into `root`.
pub fn write_install_config(root: &Path, config: InstallConfig) {
    let asset = InstallConfigAsset::new(config).unwrap();
    persist(root, asset.files()).unwrap();
}

/// Write PEM material for every keyed certificate into `root/tls`.
pub fn write_certificates(root: &Path) {
    let files: Vec<File> = CertKind::ALL
        .into_iter()
        .filter(|kind| !kind.is_bundle())
        .flat_map(|kind| {
            let stem = kind.file_stem();
            [
                File::new(format!("{TLS_DIR}/{stem}.crt"), test_cert(stem)),
                File::new(format!("{TLS_DIR}/{stem}.key"), test_key(stem)),
            ]
        })
        .collect();
    persist(root, &files).unwrap();
}

/// Decode a `data:text/plain,` URL.
pub fn decode_data_url(url: &str) -> String {
    let encoded = url.strip_prefix("data:text/plain,").expect("not a text/plain data URL");
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap();
            out.push(u8::from_str_radix(hex, 16).unwrap());
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).unwrap()
}
