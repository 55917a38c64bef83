//! Artifact descriptors for a synthesized cloud assembly

use crate::manifest::AssetManifestPayload;
use serde::{Deserialize, Serialize};
use skylift_core::Result;

/// One declared unit of a deployment plan.
///
/// Artifacts arrive as an ordered list from the assembly synthesizer.
/// Dependencies reference other artifacts by id; references to artifacts
/// outside the current selection are pruned during graph construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(flatten)]
    pub payload: ArtifactPayload,
}

/// Kind-specific payload, tagged by the artifact's `type` field.
///
/// Kinds this crate does not model (tree/metadata and anything unrecognized)
/// deserialize to the ignored variants and produce no work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ArtifactPayload {
    Stack(StackPayload),
    AssetManifest(AssetManifestPayload),
    NestedAssembly(NestedAssemblyPayload),
    Tree,
    #[serde(other)]
    Other,
}

/// Payload of a stack artifact: where it deploys and what it deploys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackPayload {
    /// Deployment target environment, e.g. "aws://1234/eu-west-1"
    pub environment: String,
    /// Template reference within the assembly
    pub template: String,
}

/// Payload of a nested-assembly artifact: the embedded child artifact list,
/// spliced into the parent during flattening.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedAssemblyPayload {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Artifact {
    /// Create a stack artifact
    pub fn stack(
        id: impl Into<String>,
        environment: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
            payload: ArtifactPayload::Stack(StackPayload {
                environment: environment.into(),
                template: template.into(),
            }),
        }
    }

    /// Create an asset-manifest artifact
    pub fn asset_manifest(id: impl Into<String>, payload: AssetManifestPayload) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
            payload: ArtifactPayload::AssetManifest(payload),
        }
    }

    /// Create a nested-assembly artifact wrapping a child artifact list
    pub fn nested(id: impl Into<String>, artifacts: Vec<Artifact>) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
            payload: ArtifactPayload::NestedAssembly(NestedAssemblyPayload { artifacts }),
        }
    }

    /// Create a tree (metadata) artifact; contributes no work
    pub fn tree(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
            payload: ArtifactPayload::Tree,
        }
    }

    /// Add declared dependencies to the artifact
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Parse a single artifact descriptor from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether this artifact kind contributes no work to the graph
    pub fn is_ignored(&self) -> bool {
        matches!(
            self.payload,
            ArtifactPayload::Tree | ArtifactPayload::Other
        )
    }

    /// Artifact kind as a short log-friendly label
    pub fn kind_str(&self) -> &'static str {
        match self.payload {
            ArtifactPayload::Stack(_) => "stack",
            ArtifactPayload::AssetManifest(_) => "asset-manifest",
            ArtifactPayload::NestedAssembly(_) => "nested-assembly",
            ArtifactPayload::Tree => "tree",
            ArtifactPayload::Other => "other",
        }
    }
}

/// Expand every nested assembly in place into its child artifacts.
///
/// The result contains no nested-assembly artifacts, only the leaf work they
/// carry. A nested assembly's own declared dependencies are not propagated;
/// ordering between its children and the surrounding artifacts is expressed
/// through the children's dependency declarations.
pub fn flatten(artifacts: Vec<Artifact>) -> Vec<Artifact> {
    let mut flat = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match artifact.payload {
            ArtifactPayload::NestedAssembly(nested) => {
                tracing::debug!(
                    assembly = %artifact.id,
                    children = nested.artifacts.len(),
                    "flattening nested assembly"
                );
                flat.extend(flatten(nested.artifacts));
            }
            _ => flat.push(artifact),
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_expands_nested_assemblies_recursively() {
        let inner = Artifact::nested(
            "inner",
            vec![Artifact::stack("deep-stack", "aws://1/r1", "deep.json")],
        );
        let outer = Artifact::nested(
            "outer",
            vec![
                Artifact::stack("mid-stack", "aws://1/r1", "mid.json"),
                inner,
            ],
        );
        let artifacts = vec![
            Artifact::stack("top-stack", "aws://1/r1", "top.json"),
            outer,
        ];

        let flat = flatten(artifacts);
        let ids: Vec<&str> = flat.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["top-stack", "mid-stack", "deep-stack"]);
        assert!(flat.iter().all(|a| {
            !matches!(a.payload, ArtifactPayload::NestedAssembly(_))
        }));
    }

    #[test]
    fn from_json_parses_a_stack_artifact() {
        let artifact = Artifact::from_json(
            r#"{
                "id": "api-stack",
                "type": "stack",
                "dependencies": ["db-stack"],
                "environment": "aws://1234/eu-west-1",
                "template": "api.template.json"
            }"#,
        )
        .unwrap();

        assert_eq!(artifact.id, "api-stack");
        assert_eq!(artifact.dependencies, vec!["db-stack".to_string()]);
        match artifact.payload {
            ArtifactPayload::Stack(stack) => {
                assert_eq!(stack.environment, "aws://1234/eu-west-1");
            }
            other => panic!("expected stack payload, got {other:?}"),
        }
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        let err = Artifact::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn unrecognized_kinds_are_ignored() {
        let artifact = Artifact::from_json(
            r#"{"id": "meta", "type": "build-info"}"#,
        )
        .unwrap();
        assert!(artifact.is_ignored());
        assert_eq!(artifact.kind_str(), "other");
    }

    #[test]
    fn tree_artifacts_are_ignored() {
        assert!(Artifact::tree("Tree").is_ignored());
    }
}
