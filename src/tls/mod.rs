//! TLS certificate/key assets.
//!
//! Certificate generation happens outside kubeboot. Each cert asset obtains
//! PEM bytes from a [`CertificateSource`] and exposes them through
//! [`CertKey::cert`] and [`CertKey::key`]. CA bundles are derived from their
//! signer and carry no key.
//!
//! Persisted layout: `tls/<name>.crt` and, for keyed certificates,
//! `tls/<name>.key`.

mod source;

pub use source::{CertKeyPair, CertificateSource, DirectoryCertificateSource, StaticCertificateSource};

use anyhow::{Context, Result};
use std::any::Any;
use std::fmt;

use crate::asset::{Asset, AssetContext, AssetKind, Parents};
use crate::core::{File, ManifestError, join_path};
use crate::store::FileFetcher;

/// Directory holding persisted certificate material.
pub const TLS_DIR: &str = "tls";

/// Identity of one certificate asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CertKind {
    RootCa,
    EtcdSigner,
    EtcdCaBundle,
    EtcdSignerClient,
    EtcdMetricCaBundle,
    EtcdMetricSigner,
    EtcdMetricSignerClient,
    MachineConfigServer,
}

impl CertKind {
    /// Every certificate kind consumed by the manifest assembler.
    pub const ALL: [CertKind; 8] = [
        CertKind::RootCa,
        CertKind::EtcdSigner,
        CertKind::EtcdCaBundle,
        CertKind::EtcdSignerClient,
        CertKind::EtcdMetricCaBundle,
        CertKind::EtcdMetricSigner,
        CertKind::EtcdMetricSignerClient,
        CertKind::MachineConfigServer,
    ];

    /// File stem used on disk and when asking a [`CertificateSource`].
    pub const fn file_stem(self) -> &'static str {
        match self {
            CertKind::RootCa => "root-ca",
            CertKind::EtcdSigner => "etcd-signer",
            CertKind::EtcdCaBundle => "etcd-ca-bundle",
            CertKind::EtcdSignerClient => "etcd-signer-client",
            CertKind::EtcdMetricCaBundle => "etcd-metric-ca-bundle",
            CertKind::EtcdMetricSigner => "etcd-metric-signer",
            CertKind::EtcdMetricSignerClient => "etcd-metric-signer-client",
            CertKind::MachineConfigServer => "machine-config-server",
        }
    }

    /// Human-readable asset name.
    pub const fn name(self) -> &'static str {
        match self {
            CertKind::RootCa => "Root CA",
            CertKind::EtcdSigner => "Certificate (etcd-signer)",
            CertKind::EtcdCaBundle => "Certificate (etcd-ca-bundle)",
            CertKind::EtcdSignerClient => "Certificate (etcd-signer-client)",
            CertKind::EtcdMetricCaBundle => "Certificate (etcd-metric-ca-bundle)",
            CertKind::EtcdMetricSigner => "Certificate (etcd-metric-signer)",
            CertKind::EtcdMetricSignerClient => "Certificate (etcd-metric-signer-client)",
            CertKind::MachineConfigServer => "Certificate (mcs)",
        }
    }

    /// CA bundles are certificate-only.
    pub const fn is_bundle(self) -> bool {
        matches!(self, CertKind::EtcdCaBundle | CertKind::EtcdMetricCaBundle)
    }

    /// The certificate this one is issued by or bundled from, if any.
    pub const fn signer(self) -> Option<CertKind> {
        match self {
            CertKind::EtcdCaBundle | CertKind::EtcdSignerClient => Some(CertKind::EtcdSigner),
            CertKind::EtcdMetricCaBundle | CertKind::EtcdMetricSignerClient => {
                Some(CertKind::EtcdMetricSigner)
            }
            CertKind::MachineConfigServer => Some(CertKind::RootCa),
            CertKind::RootCa | CertKind::EtcdSigner | CertKind::EtcdMetricSigner => None,
        }
    }

    /// Declared dependencies of this certificate asset.
    pub fn dependencies(self) -> Vec<AssetKind> {
        self.signer().map(AssetKind::Cert).into_iter().collect()
    }

    fn cert_path(self) -> String {
        join_path(TLS_DIR, &format!("{}.crt", self.file_stem()))
    }

    fn key_path(self) -> String {
        join_path(TLS_DIR, &format!("{}.key", self.file_stem()))
    }
}

/// A resolved certificate and (unless it is a bundle) its private key.
#[derive(Clone, PartialEq, Eq)]
pub struct CertKey {
    kind: CertKind,
    cert: Vec<u8>,
    key: Vec<u8>,
    files: Vec<File>,
}

impl fmt::Debug for CertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertKey")
            .field("kind", &self.kind)
            .field("cert_len", &self.cert.len())
            .field("has_key", &!self.key.is_empty())
            .finish()
    }
}

impl CertKey {
    fn new(kind: CertKind, cert: Vec<u8>, key: Vec<u8>) -> Self {
        let mut files = vec![File::new(kind.cert_path(), cert.clone())];
        if !kind.is_bundle() {
            files.push(File::new(kind.key_path(), key.clone()));
        }
        Self {
            kind,
            cert,
            key,
            files,
        }
    }

    /// Which certificate this is.
    pub fn cert_kind(&self) -> CertKind {
        self.kind
    }

    /// PEM-encoded certificate (or concatenated certificates for a bundle).
    pub fn cert(&self) -> &[u8] {
        &self.cert
    }

    /// PEM-encoded private key; empty for bundles.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub(crate) fn generate(kind: CertKind, parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        if kind.is_bundle() {
            // Bundles are the signer certificate on its own.
            let signer = kind.signer().context("bundle without signer")?;
            let signer = parents.cert(signer)?;
            return Ok(Self::new(kind, signer.cert().to_vec(), Vec::new()));
        }

        if let Some(signer) = kind.signer() {
            // Resolved first so a missing signer is reported against this asset.
            parents.cert(signer)?;
        }

        let pair = ctx.certificates.cert_key(kind.file_stem())?;
        validate_pem(kind, "certificate", &pair.cert)?;
        validate_pem(kind, "key", &pair.key)?;
        tracing::debug!("Obtained {} from {:?}", kind.name(), ctx.certificates);
        Ok(Self::new(kind, pair.cert, pair.key))
    }

    pub(crate) fn load(
        kind: CertKind,
        fetcher: &dyn FileFetcher,
        _ctx: &AssetContext,
    ) -> Result<Option<Self>> {
        let Some(cert) = fetcher.fetch_by_name(&kind.cert_path())? else {
            return Ok(None);
        };
        validate_pem(kind, "certificate", &cert.data)?;

        if kind.is_bundle() {
            return Ok(Some(Self::new(kind, cert.data, Vec::new())));
        }

        let key = fetcher.fetch_by_name(&kind.key_path())?.ok_or_else(|| {
            ManifestError::Certificate {
                name: kind.file_stem().to_string(),
                reason: format!("{} exists but {} is missing", kind.cert_path(), kind.key_path()),
            }
        })?;
        validate_pem(kind, "key", &key.data)?;

        Ok(Some(Self::new(kind, cert.data, key.data)))
    }
}

impl Asset for CertKey {
    fn kind(&self) -> AssetKind {
        AssetKind::Cert(self.kind)
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

fn validate_pem(kind: CertKind, what: &str, data: &[u8]) -> Result<(), ManifestError> {
    let invalid = |reason: String| ManifestError::Certificate {
        name: kind.file_stem().to_string(),
        reason,
    };
    let text = std::str::from_utf8(data).map_err(|_| invalid(format!("{what} is not UTF-8 PEM")))?;
    if !text.contains("-----BEGIN ") {
        return Err(invalid(format!("{what} is not PEM encoded")));
    }
    Ok(())
}
