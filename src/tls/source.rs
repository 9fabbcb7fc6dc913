//! Certificate sources: where PEM material comes from.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::ManifestError;

/// A certificate and its private key, both PEM encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct CertKeyPair {
    pub cert: Vec<u8>,
    pub key: Vec<u8>,
}

impl fmt::Debug for CertKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertKeyPair")
            .field("cert_len", &self.cert.len())
            .field("key_len", &self.key.len())
            .finish()
    }
}

/// Provider of certificate/key pairs, looked up by file stem
/// (e.g. `etcd-signer`).
pub trait CertificateSource: fmt::Debug + Send + Sync {
    fn cert_key(&self, name: &str) -> Result<CertKeyPair, ManifestError>;
}

/// Reads `<dir>/<name>.crt` and `<dir>/<name>.key`.
#[derive(Debug, Clone)]
pub struct DirectoryCertificateSource {
    dir: PathBuf,
}

impl DirectoryCertificateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, name: &str, extension: &str) -> Result<Vec<u8>, ManifestError> {
        let path = self.dir.join(format!("{name}.{extension}"));
        std::fs::read(&path).map_err(|e| ManifestError::Certificate {
            name: name.to_string(),
            reason: format!("cannot read {}: {e}", path.display()),
        })
    }
}

impl CertificateSource for DirectoryCertificateSource {
    fn cert_key(&self, name: &str) -> Result<CertKeyPair, ManifestError> {
        Ok(CertKeyPair {
            cert: self.read(name, "crt")?,
            key: self.read(name, "key")?,
        })
    }
}

/// In-memory certificate source.
#[derive(Debug, Clone, Default)]
pub struct StaticCertificateSource {
    pairs: HashMap<String, CertKeyPair>,
}

impl StaticCertificateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pair under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, cert: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) {
        self.pairs.insert(
            name.into(),
            CertKeyPair {
                cert: cert.into(),
                key: key.into(),
            },
        );
    }

    /// Builder form of [`StaticCertificateSource::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, cert: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        self.insert(name, cert, key);
        self
    }
}

impl CertificateSource for StaticCertificateSource {
    fn cert_key(&self, name: &str) -> Result<CertKeyPair, ManifestError> {
        self.pairs.get(name).cloned().ok_or_else(|| ManifestError::Certificate {
            name: name.to_string(),
            reason: "not provided".to_string(),
        })
    }
}
