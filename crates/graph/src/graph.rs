//! The work graph: node population, readiness frontier, and completion
//! bookkeeping

use crate::node::{DeploymentState, WorkKind, WorkNode};
use indexmap::IndexMap;
use petgraph::graph::DiGraph;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Owns the complete set of work nodes for one run.
///
/// Built once by [`crate::GraphBuilder`], mutated only by the executor as
/// handlers complete, discarded when the run finishes. No node is ever added
/// after construction.
#[derive(Debug, Default)]
pub struct WorkGraph {
    /// All nodes, in insertion order
    nodes: IndexMap<String, WorkNode>,
    /// Ids whose work has completed
    done: HashSet<String>,
}

impl WorkGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, node: WorkNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Look up a node by id.
    ///
    /// Panics on an unknown id: asking for a node that was never constructed
    /// is a programming error, not a runtime condition.
    pub fn node(&self, id: &str) -> &WorkNode {
        self.nodes
            .get(id)
            .unwrap_or_else(|| panic!("unknown work node '{id}'"))
    }

    fn node_mut(&mut self, id: &str) -> &mut WorkNode {
        self.nodes
            .get_mut(id)
            .unwrap_or_else(|| panic!("unknown work node '{id}'"))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &WorkNode> {
        self.nodes.values()
    }

    /// Pending nodes whose entire dependency set has completed.
    ///
    /// Returned in insertion order; callers must not read any scheduling
    /// priority into that.
    pub fn ready(&self) -> Vec<&WorkNode> {
        self.nodes
            .values()
            .filter(|node| node.state == DeploymentState::Pending)
            .filter(|node| node.dependencies.iter().all(|dep| self.done.contains(dep)))
            .collect()
    }

    /// Take up to `limit` ready nodes, marking them queued for dispatch
    pub(crate) fn take_ready(&mut self, limit: usize) -> Vec<String> {
        let ids: Vec<String> = self
            .ready()
            .into_iter()
            .take(limit)
            .map(|node| node.id.clone())
            .collect();
        for id in &ids {
            self.node_mut(id).state = DeploymentState::Queued;
        }
        ids
    }

    /// Record a node as completed, unblocking its dependents.
    ///
    /// Safe to call more than once for the same id.
    pub(crate) fn mark_done(&mut self, id: &str) {
        self.node_mut(id).state = DeploymentState::Completed;
        self.done.insert(id.to_string());
    }

    pub(crate) fn mark_failed(&mut self, id: &str) {
        self.node_mut(id).state = DeploymentState::Failed;
    }

    pub(crate) fn set_state(&mut self, id: &str, state: DeploymentState) {
        self.node_mut(id).state = state;
    }

    /// Whether any node is still waiting to be dispatched
    pub fn has_pending(&self) -> bool {
        self.nodes
            .values()
            .any(|node| node.state == DeploymentState::Pending)
    }

    pub(crate) fn set_dependencies(&mut self, id: &str, dependencies: BTreeSet<String>) {
        self.node_mut(id).dependencies = dependencies;
    }

    pub(crate) fn extend_dependencies(
        &mut self,
        id: &str,
        dependencies: impl IntoIterator<Item = String>,
    ) {
        self.node_mut(id).dependencies.extend(dependencies);
    }

    /// Find one dependency cycle among unfinished nodes, if any.
    ///
    /// Used to produce a descriptive error when the executor can no longer
    /// make progress.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut graph = DiGraph::<&str, ()>::new();
        let mut indices = HashMap::new();
        for node in self.unfinished() {
            indices.insert(node.id.as_str(), graph.add_node(node.id.as_str()));
        }
        for node in self.unfinished() {
            let Some(&from) = indices.get(node.id.as_str()) else {
                continue;
            };
            for dep in &node.dependencies {
                if let Some(&to) = indices.get(dep.as_str()) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        petgraph::algo::tarjan_scc(&graph)
            .into_iter()
            .find(|scc| scc.len() > 1 || graph.find_edge(scc[0], scc[0]).is_some())
            .map(|scc| scc.into_iter().map(|ix| graph[ix].to_string()).collect())
    }

    fn unfinished(&self) -> impl Iterator<Item = &WorkNode> {
        self.nodes
            .values()
            .filter(|node| node.state != DeploymentState::Completed)
    }

    /// Remove asset-publish nodes the caller already considers satisfied,
    /// then asset-build nodes no remaining node depends on, then dependency
    /// references left dangling by the removals.
    ///
    /// Dependents of a removed publish proceed as if it had completed.
    pub fn remove_unnecessary_assets<F>(&mut self, is_unnecessary: F)
    where
        F: Fn(&WorkNode) -> bool,
    {
        let unnecessary: Vec<String> = self
            .nodes
            .values()
            .filter(|node| matches!(node.kind, WorkKind::AssetPublish { .. }))
            .filter(|node| is_unnecessary(node))
            .map(|node| node.id.clone())
            .collect();
        for id in &unnecessary {
            self.nodes.shift_remove(id);
        }

        let still_required: HashSet<String> = self
            .nodes
            .values()
            .flat_map(|node| node.dependencies.iter().cloned())
            .collect();
        let orphaned: Vec<String> = self
            .nodes
            .values()
            .filter(|node| matches!(node.kind, WorkKind::AssetBuild { .. }))
            .filter(|node| !still_required.contains(&node.id))
            .map(|node| node.id.clone())
            .collect();
        for id in &orphaned {
            self.nodes.shift_remove(id);
        }

        if unnecessary.is_empty() && orphaned.is_empty() {
            return;
        }
        tracing::debug!(
            publishes = unnecessary.len(),
            builds = orphaned.len(),
            "removed unnecessary asset nodes"
        );

        let remaining: HashSet<String> = self.nodes.keys().cloned().collect();
        let done = &self.done;
        for node in self.nodes.values_mut() {
            node.dependencies
                .retain(|dep| remaining.contains(dep) || done.contains(dep));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylift_assembly::{AssetPackaging, AssetSource};

    fn build_node(id: &str, deps: &[&str]) -> WorkNode {
        let mut node = WorkNode::new(
            id,
            WorkKind::AssetBuild {
                file_id: id.to_string(),
                source: AssetSource {
                    path: format!("assets/{id}"),
                    packaging: AssetPackaging::File,
                },
            },
        );
        node.dependencies = deps.iter().map(ToString::to_string).collect();
        node
    }

    #[test]
    fn ready_tracks_completed_dependencies() {
        let mut graph = WorkGraph::new();
        graph.insert(build_node("first", &[]));
        graph.insert(build_node("second", &["first"]));

        let ready: Vec<&str> = graph.ready().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ready, vec!["first"]);

        graph.mark_done("first");
        let ready: Vec<&str> = graph.ready().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ready, vec!["second"]);
    }

    #[test]
    fn mark_done_is_idempotent() {
        let mut graph = WorkGraph::new();
        graph.insert(build_node("only", &[]));
        graph.insert(build_node("after", &["only"]));

        graph.mark_done("only");
        graph.mark_done("only");

        assert_eq!(graph.node("only").state, DeploymentState::Completed);
        let ready: Vec<&str> = graph.ready().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ready, vec!["after"]);
    }

    #[test]
    #[should_panic(expected = "unknown work node")]
    fn node_lookup_fails_loudly_on_unknown_id() {
        let graph = WorkGraph::new();
        graph.node("missing");
    }

    #[test]
    fn take_ready_respects_the_limit_and_queues_nodes() {
        let mut graph = WorkGraph::new();
        graph.insert(build_node("a", &[]));
        graph.insert(build_node("b", &[]));
        graph.insert(build_node("c", &[]));

        let taken = graph.take_ready(2);
        assert_eq!(taken, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(graph.node("a").state, DeploymentState::Queued);
        assert_eq!(graph.node("c").state, DeploymentState::Pending);

        // Queued nodes no longer show up as ready
        let ready: Vec<&str> = graph.ready().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ready, vec!["c"]);
    }

    fn publish_node(file_id: &str, destination_id: &str) -> WorkNode {
        let id = format!("{file_id}-{destination_id}-publish");
        let mut node = WorkNode::new(
            id,
            WorkKind::AssetPublish {
                file_id: file_id.to_string(),
                destination_id: destination_id.to_string(),
                destination: Default::default(),
            },
        );
        node.dependencies.insert(format!("{file_id}-build"));
        node
    }

    #[test]
    fn unnecessary_publishes_are_removed_but_shared_builds_survive() {
        let mut graph = WorkGraph::new();
        graph.insert(build_node("f-build", &[]));
        graph.insert(publish_node("f", "d1"));
        graph.insert(publish_node("f", "d2"));

        graph.remove_unnecessary_assets(|node| node.id == "f-d2-publish");

        assert!(!graph.contains("f-d2-publish"));
        // d1 still needs the build
        assert!(graph.contains("f-build"));
        assert!(graph.contains("f-d1-publish"));
    }

    #[test]
    fn orphaned_builds_follow_their_publishes_out() {
        let mut graph = WorkGraph::new();
        graph.insert(build_node("f-build", &[]));
        graph.insert(publish_node("f", "d1"));
        let mut consumer = WorkNode::new(
            "consumer",
            WorkKind::Stack {
                artifact: std::sync::Arc::new(skylift_assembly::Artifact::stack(
                    "consumer",
                    "aws://1234/eu-west-1",
                    "consumer.template.json",
                )),
            },
        );
        consumer.dependencies.insert("f-d1-publish".to_string());
        graph.insert(consumer);

        graph.remove_unnecessary_assets(|node| {
            matches!(node.kind, WorkKind::AssetPublish { .. })
        });

        assert_eq!(graph.len(), 1);
        // The consumer proceeds as if the publish had completed
        assert!(graph.node("consumer").dependencies.is_empty());
        let ready: Vec<&str> = graph.ready().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ready, vec!["consumer"]);
    }

    #[test]
    fn find_cycle_reports_the_cyclic_nodes() {
        let mut graph = WorkGraph::new();
        graph.insert(build_node("a", &["b"]));
        graph.insert(build_node("b", &["a"]));
        graph.insert(build_node("free", &[]));

        let cycle = graph.find_cycle().expect("cycle should be detected");
        let mut cycle_sorted = cycle.clone();
        cycle_sorted.sort();
        assert_eq!(cycle_sorted, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn find_cycle_ignores_acyclic_graphs() {
        let mut graph = WorkGraph::new();
        graph.insert(build_node("a", &[]));
        graph.insert(build_node("b", &["a"]));
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn self_dependency_counts_as_a_cycle() {
        let mut graph = WorkGraph::new();
        graph.insert(build_node("loop", &["loop"]));
        assert_eq!(graph.find_cycle(), Some(vec!["loop".to_string()]));
    }
}
