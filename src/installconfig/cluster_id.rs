//! Cluster identity: a UUID plus a short infrastructure ID.

use anyhow::Result;
use std::any::Any;
use uuid::Uuid;

use super::InstallConfigAsset;
use crate::asset::{Asset, AssetContext, AssetKind, Generate, Parents};

/// Maximum length of an infrastructure ID, suffix included.
const INFRA_ID_MAX_LEN: usize = 27;

const INFRA_ID_SUFFIX_LEN: usize = 5;

/// Consonants and digits only, so suffixes never spell words.
const INFRA_ID_ALPHABET: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";

/// Unique identifiers of the cluster being installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterId {
    /// Cluster UUID, as used by the cluster version operator.
    pub uuid: String,
    /// Name prefix for cloud resources, e.g. `mycluster-x7k2q`.
    pub infra_id: String,
}

impl ClusterId {
    /// Build the identity for a cluster name from a fixed UUID.
    pub fn from_uuid(cluster_name: &str, uuid: Uuid) -> Self {
        Self {
            uuid: uuid.to_string(),
            infra_id: infra_id(cluster_name, uuid),
        }
    }
}

/// Lowercase the name, map anything outside `[a-z0-9-]` to `-`, truncate,
/// then append `-` and a suffix derived from the UUID bytes.
fn infra_id(cluster_name: &str, uuid: Uuid) -> String {
    let base: String = cluster_name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .take(INFRA_ID_MAX_LEN - INFRA_ID_SUFFIX_LEN - 1)
        .collect();
    let base = base.trim_end_matches('-');

    let suffix: String = uuid
        .as_bytes()
        .iter()
        .take(INFRA_ID_SUFFIX_LEN)
        .map(|b| char::from(INFRA_ID_ALPHABET[usize::from(*b) % INFRA_ID_ALPHABET.len()]))
        .collect();

    format!("{base}-{suffix}")
}

impl Asset for ClusterId {
    fn kind(&self) -> AssetKind {
        AssetKind::ClusterId
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Generate for ClusterId {
    const KIND: AssetKind = AssetKind::ClusterId;

    fn dependencies() -> Vec<AssetKind> {
        vec![AssetKind::InstallConfig]
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let install_config = parents.get::<InstallConfigAsset>()?;
        let uuid = ctx.cluster_id.unwrap_or_else(Uuid::new_v4);
        let id = Self::from_uuid(&install_config.config.metadata.name, uuid);
        tracing::debug!("Cluster {} has infrastructure ID {}", id.uuid, id.infra_id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED: Uuid = Uuid::from_u128(0x0b6f_2bb3_4c9a_4d0e_9d9e_0c1b_1b9f_0c11);

    #[test]
    fn test_infra_id_is_deterministic_for_a_uuid() {
        let a = ClusterId::from_uuid("test-cluster", FIXED);
        let b = ClusterId::from_uuid("test-cluster", FIXED);
        assert_eq!(a, b);
        assert_eq!(a.uuid, "0b6f2bb3-4c9a-4d0e-9d9e-0c1b1b9f0c11");
        assert!(a.infra_id.starts_with("test-cluster-"));
        assert_eq!(a.infra_id.len(), "test-cluster-".len() + INFRA_ID_SUFFIX_LEN);
    }

    #[test]
    fn test_infra_id_sanitizes_and_truncates() {
        let id = infra_id("My_Very.Long Cluster Name For Testing", FIXED);
        assert!(id.len() <= INFRA_ID_MAX_LEN);
        assert!(id.starts_with("my-very-long-cluster-"));
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!id.contains("--"));
    }

    #[test]
    fn test_suffix_alphabet() {
        let id = infra_id("c", Uuid::from_u128(u128::MAX));
        let suffix = id.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), INFRA_ID_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| INFRA_ID_ALPHABET.contains(&b)));
    }
}
