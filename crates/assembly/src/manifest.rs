//! File-asset manifest payloads
//!
//! An asset manifest lists the file assets a deployment needs: where each
//! file comes from and every destination it must be published to before the
//! consuming stacks can deploy.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Payload of an asset-manifest artifact: file-asset id to its build/publish
/// description, in manifest order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifestPayload {
    #[serde(default)]
    pub files: IndexMap<String, FileAsset>,
}

/// One file asset: a single content source and the destinations it is
/// published to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAsset {
    pub source: AssetSource,
    #[serde(default)]
    pub destinations: IndexMap<String, AssetDestination>,
}

/// Where an asset's content comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSource {
    /// Path to the content, relative to the assembly root
    pub path: String,
    #[serde(default)]
    pub packaging: AssetPackaging,
}

/// How the source content is packaged before upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetPackaging {
    #[default]
    File,
    Zip,
}

/// An opaque storage location an asset is published to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDestination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assume_role_arn: Option<String>,
}

impl FileAsset {
    /// Create a file asset from a source path and a set of destinations
    pub fn new(
        source_path: impl Into<String>,
        destinations: IndexMap<String, AssetDestination>,
    ) -> Self {
        Self {
            source: AssetSource {
                path: source_path.into(),
                packaging: AssetPackaging::File,
            },
            destinations,
        }
    }
}
