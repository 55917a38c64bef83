//! Dependency resolution for work-graph construction
//!
//! Maps declared artifact dependencies to the node identities they resolve
//! to, pruning references to artifacts outside the current selection.

use std::collections::{BTreeSet, HashMap};

/// Node id of the build step for a file asset
pub(crate) fn build_node_id(file_id: &str) -> String {
    format!("{file_id}-build")
}

/// Node id of the publish step for a (file, destination) pair
pub(crate) fn publish_node_id(file_id: &str, destination_id: &str) -> String {
    format!("{file_id}-{destination_id}-publish")
}

/// Index from artifact identity to the node identities that artifact stands
/// for when named as a dependency.
///
/// A stack stands for its own deploy node. An asset manifest stands for
/// every publish node it produced: a dependent must wait for all
/// destinations, not merely the build.
#[derive(Debug, Default)]
pub(crate) struct ArtifactIndex {
    targets: HashMap<String, Vec<String>>,
}

impl ArtifactIndex {
    pub(crate) fn record_stack(&mut self, artifact_id: &str) {
        self.targets
            .insert(artifact_id.to_string(), vec![artifact_id.to_string()]);
    }

    /// Register a manifest so that even an empty one resolves (to nothing)
    pub(crate) fn record_manifest(&mut self, artifact_id: &str) {
        self.targets.entry(artifact_id.to_string()).or_default();
    }

    pub(crate) fn record_publish(&mut self, artifact_id: &str, publish_id: String) {
        self.targets
            .entry(artifact_id.to_string())
            .or_default()
            .push(publish_id);
    }

    /// Resolve declared dependency ids to node ids.
    ///
    /// Identities absent from the selection resolve to nothing and are
    /// silently dropped; the consumer proceeds as if the edge did not exist.
    pub(crate) fn resolve(&self, declared: &[String]) -> BTreeSet<String> {
        declared
            .iter()
            .flat_map(|dep| self.targets.get(dep).into_iter().flatten())
            .cloned()
            .collect()
    }

    /// Resolve declared dependencies, skipping one identity entirely
    pub(crate) fn resolve_excluding(
        &self,
        declared: &[String],
        excluded: &str,
    ) -> BTreeSet<String> {
        declared
            .iter()
            .filter(|dep| dep.as_str() != excluded)
            .flat_map(|dep| self.targets.get(dep).into_iter().flatten())
            .cloned()
            .collect()
    }
}
