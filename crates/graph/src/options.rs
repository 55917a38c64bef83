//! Immutable run options shared by the graph builder and the executor

use serde::{Deserialize, Serialize};

/// Options fixed for the lifetime of one work-graph run.
///
/// Constructed by the caller and never mutated afterwards; both the graph
/// builder and the executor read from the same instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployOptions {
    /// Build assets as early as their own prerequisites allow, instead of
    /// inline with the deploy order of the stacks that consume them
    pub prebuild_assets: bool,

    /// Maximum number of handler invocations in flight at once
    pub concurrency: usize,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            prebuild_assets: true,
            concurrency: 1,
        }
    }
}
