//! Image content source policies, one manifest per mirrored source.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{ClusterResource, ResourceMeta, writable_asset};
use crate::asset::{AssetContext, AssetKind, Generate, Parents};
use crate::core::File;
use crate::installconfig::{ImageContentSource, InstallConfigAsset};

const OPERATOR_API_VERSION: &str = "operator.openshift.io/v1alpha1";

/// A source repository and its digest mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDigestMirrors {
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mirrors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    pub repository_digest_mirrors: Vec<RepositoryDigestMirrors>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContentSourcePolicy {
    pub policies: Vec<ClusterResource<PolicySpec>>,
    files: Vec<File>,
}

writable_asset!(ImageContentSourcePolicy, AssetKind::ImageContentSourcePolicy);

impl Generate for ImageContentSourcePolicy {
    const KIND: AssetKind = AssetKind::ImageContentSourcePolicy;

    fn dependencies() -> Vec<AssetKind> {
        vec![AssetKind::InstallConfig]
    }

    fn generate(parents: &Parents<'_>, ctx: &AssetContext) -> Result<Self> {
        let install_config = &parents.get::<InstallConfigAsset>()?.config;

        let mut policies = Vec::new();
        let mut files = Vec::new();
        for (i, group) in merge_sources(&install_config.image_content_sources).into_iter().enumerate()
        {
            let policy = ClusterResource {
                api_version: OPERATOR_API_VERSION.to_string(),
                kind: "ImageContentSourcePolicy".to_string(),
                metadata: ResourceMeta::named(format!("image-policy-{i}")),
                spec: PolicySpec {
                    repository_digest_mirrors: vec![group],
                },
                status: None,
            };
            files.push(
                policy.to_file(ctx.config.manifest_path(&format!("image-content-source-policy-{i}.yaml")))?,
            );
            policies.push(policy);
        }

        Ok(Self {
            policies,
            files,
        })
    }
}

/// Merge entries sharing a source, keeping first-seen order for both sources
/// and mirrors.
pub(crate) fn merge_sources(sources: &[ImageContentSource]) -> Vec<RepositoryDigestMirrors> {
    let mut merged: Vec<RepositoryDigestMirrors> = Vec::new();
    for entry in sources {
        let index = match merged.iter().position(|group| group.source == entry.source) {
            Some(index) => index,
            None => {
                merged.push(RepositoryDigestMirrors {
                    source: entry.source.clone(),
                    mirrors: Vec::new(),
                });
                merged.len() - 1
            }
        };
        let group = &mut merged[index];
        for mirror in &entry.mirrors {
            if !group.mirrors.contains(mirror) {
                group.mirrors.push(mirror.clone());
            }
        }
    }
    merged
}
