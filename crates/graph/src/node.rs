//! Typed work nodes for the execution graph

use skylift_assembly::{Artifact, AssetDestination, AssetSource};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Lifecycle of a work node as the executor drives it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentState {
    /// Waiting for its dependencies to complete
    Pending,
    /// Selected for dispatch in the current round
    Queued,
    /// Handler invocation in flight
    Deploying,
    Completed,
    Failed,
}

/// Kind-specific payload dispatched to the matching handler
#[derive(Debug, Clone)]
pub enum WorkKind {
    /// Deploy one stack artifact
    Stack { artifact: Arc<Artifact> },

    /// Build one file asset from its source
    AssetBuild {
        file_id: String,
        source: AssetSource,
    },

    /// Publish one built file asset to one destination
    AssetPublish {
        file_id: String,
        destination_id: String,
        destination: AssetDestination,
    },
}

/// One schedulable unit of work in the graph
#[derive(Debug, Clone)]
pub struct WorkNode {
    /// Identity, unique within a single graph
    pub id: String,
    /// Node ids that must complete before this node may run
    pub dependencies: BTreeSet<String>,
    pub kind: WorkKind,
    pub state: DeploymentState,
}

impl WorkNode {
    pub fn new(id: impl Into<String>, kind: WorkKind) -> Self {
        Self {
            id: id.into(),
            dependencies: BTreeSet::new(),
            kind,
            state: DeploymentState::Pending,
        }
    }

    /// Node kind as a short log-friendly label
    pub fn kind_str(&self) -> &'static str {
        match self.kind {
            WorkKind::Stack { .. } => "stack",
            WorkKind::AssetBuild { .. } => "asset-build",
            WorkKind::AssetPublish { .. } => "asset-publish",
        }
    }
}
