//! Work graph builder
//!
//! Consumes a cloud assembly's artifact list and produces the typed work
//! graph the executor drains: one deploy node per stack, one build node per
//! distinct file asset, one publish node per (file, destination) pair.

pub(crate) mod dependency;

use crate::graph::WorkGraph;
use crate::node::{WorkKind, WorkNode};
use crate::options::DeployOptions;
use dependency::{build_node_id, publish_node_id, ArtifactIndex};
use skylift_assembly::{flatten, Artifact, ArtifactPayload};
use skylift_core::{Error, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Builds a [`WorkGraph`] from a flat or nested artifact list.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    prebuild_assets: bool,
}

struct StackRecord {
    id: String,
    dependencies: Vec<String>,
}

struct ManifestRecord {
    id: String,
    dependencies: Vec<String>,
    build_ids: Vec<String>,
}

impl GraphBuilder {
    pub fn new(options: &DeployOptions) -> Self {
        Self {
            prebuild_assets: options.prebuild_assets,
        }
    }

    /// Build the work graph for the given artifact selection.
    ///
    /// Nested assemblies are flattened first; ignored artifact kinds
    /// contribute nothing; dependency references to artifacts outside the
    /// selection are dropped. Cyclic declarations are not detected here: the
    /// executor diagnoses the resulting stall.
    pub fn build(&self, artifacts: Vec<Artifact>) -> Result<WorkGraph> {
        let artifacts = flatten(artifacts);
        let selected: Vec<Artifact> =
            artifacts.into_iter().filter(|a| !a.is_ignored()).collect();

        let mut graph = WorkGraph::new();
        let mut index = ArtifactIndex::default();
        let mut stacks: Vec<StackRecord> = Vec::new();
        let mut manifests: Vec<ManifestRecord> = Vec::new();

        for artifact in &selected {
            match &artifact.payload {
                ArtifactPayload::Stack(_) => {
                    if graph.contains(&artifact.id) {
                        return Err(Error::assembly(
                            &artifact.id,
                            "duplicate artifact id in assembly",
                        ));
                    }
                    index.record_stack(&artifact.id);
                    stacks.push(StackRecord {
                        id: artifact.id.clone(),
                        dependencies: artifact.dependencies.clone(),
                    });
                    graph.insert(WorkNode::new(
                        artifact.id.clone(),
                        WorkKind::Stack {
                            artifact: Arc::new(artifact.clone()),
                        },
                    ));
                    tracing::debug!(artifact = %artifact.id, "added stack node");
                }
                ArtifactPayload::AssetManifest(manifest) => {
                    index.record_manifest(&artifact.id);
                    let mut build_ids = Vec::new();
                    for (file_id, file) in &manifest.files {
                        let build_id = build_node_id(file_id);
                        // One build node per distinct file, shared when
                        // several manifests reference the same asset.
                        if !graph.contains(&build_id) {
                            graph.insert(WorkNode::new(
                                build_id.clone(),
                                WorkKind::AssetBuild {
                                    file_id: file_id.clone(),
                                    source: file.source.clone(),
                                },
                            ));
                        }
                        build_ids.push(build_id.clone());
                        for (destination_id, destination) in &file.destinations {
                            let publish_id = publish_node_id(file_id, destination_id);
                            if !graph.contains(&publish_id) {
                                let mut node = WorkNode::new(
                                    publish_id.clone(),
                                    WorkKind::AssetPublish {
                                        file_id: file_id.clone(),
                                        destination_id: destination_id.clone(),
                                        destination: destination.clone(),
                                    },
                                );
                                node.dependencies.insert(build_id.clone());
                                graph.insert(node);
                            }
                            index.record_publish(&artifact.id, publish_id);
                        }
                    }
                    manifests.push(ManifestRecord {
                        id: artifact.id.clone(),
                        dependencies: artifact.dependencies.clone(),
                        build_ids,
                    });
                    tracing::debug!(
                        artifact = %artifact.id,
                        files = manifest.files.len(),
                        "added asset nodes"
                    );
                }
                // Flattening removed nested assemblies, the filter above
                // removed ignored kinds.
                _ => {}
            }
        }

        for stack in &stacks {
            graph.set_dependencies(&stack.id, index.resolve(&stack.dependencies));
        }

        for manifest in &manifests {
            let deps = self.asset_build_dependencies(manifest, &stacks, &index);
            for build_id in &manifest.build_ids {
                graph.extend_dependencies(build_id, deps.iter().cloned());
            }
        }

        tracing::debug!(nodes = graph.len(), "work graph assembled");
        Ok(graph)
    }

    /// Dependencies of a manifest's build nodes under the active policy.
    ///
    /// Prebuilt assets depend only on the manifest's own prerequisites, so
    /// builds start as early and as parallel as those allow. Inline
    /// (non-prebuilt) builds additionally wait for everything else their
    /// consuming stacks wait for, placing the build in its consumer's deploy
    /// order.
    fn asset_build_dependencies(
        &self,
        manifest: &ManifestRecord,
        stacks: &[StackRecord],
        index: &ArtifactIndex,
    ) -> BTreeSet<String> {
        let mut deps = index.resolve(&manifest.dependencies);
        if !self.prebuild_assets {
            let consumers = stacks
                .iter()
                .filter(|stack| stack.dependencies.iter().any(|dep| dep == &manifest.id));
            for stack in consumers {
                deps.extend(index.resolve_excluding(&stack.dependencies, &manifest.id));
            }
        }
        deps
    }
}
