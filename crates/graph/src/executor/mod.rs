//! Bounded-parallel execution of a work graph
//!
//! A single coordinator loop owns the graph and dispatches ready nodes into
//! caller-supplied asynchronous handlers, never exceeding the configured
//! concurrency. Handler completions feed back into the graph and may unblock
//! dependents. The first failure stops all further dispatch; in-flight work
//! is awaited, never cancelled.


use crate::graph::WorkGraph;
use crate::node::{DeploymentState, WorkKind};
use crate::options::DeployOptions;
use async_trait::async_trait;
use skylift_assembly::{Artifact, AssetDestination, AssetSource};
use skylift_core::{Error, Result};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Asynchronous handlers performing the actual deploy/build/publish work.
///
/// Implementations are supplied by the caller and may perform arbitrary I/O;
/// the executor only sequences them.
#[async_trait]
pub trait WorkHandlers: Send + Sync + 'static {
    /// Deploy one stack
    async fn deploy_stack(&self, stack: &Artifact) -> anyhow::Result<()>;

    /// Build one file asset from its source
    async fn build_asset(&self, file_id: &str, source: &AssetSource) -> anyhow::Result<()>;

    /// Publish one built file asset to one destination
    async fn publish_asset(
        &self,
        file_id: &str,
        destination_id: &str,
        destination: &AssetDestination,
    ) -> anyhow::Result<()>;
}

/// Drain the graph, dispatching ready nodes to the handlers with at most
/// `options.concurrency` invocations in flight.
///
/// Completes when every node has run, or returns the first handler error
/// once in-flight work settles. Nodes not yet dispatched when a failure
/// lands are never started, downstream and independent alike.
pub async fn execute<H>(graph: WorkGraph, options: &DeployOptions, handlers: Arc<H>) -> Result<()>
where
    H: WorkHandlers,
{
    if options.concurrency == 0 {
        return Err(Error::configuration("concurrency must be at least 1"));
    }
    let span = tracing::info_span!(
        "execute",
        nodes = graph.len(),
        concurrency = options.concurrency
    );
    drain(graph, options.concurrency, handlers).instrument(span).await
}

async fn drain<H>(mut graph: WorkGraph, concurrency: usize, handlers: Arc<H>) -> Result<()>
where
    H: WorkHandlers,
{
    let mut in_flight: JoinSet<(String, anyhow::Result<()>)> = JoinSet::new();
    let mut first_error: Option<Error> = None;

    loop {
        if first_error.is_none() {
            let capacity = concurrency - in_flight.len();
            for id in graph.take_ready(capacity) {
                dispatch(&mut graph, &mut in_flight, id, Arc::clone(&handlers));
            }
        }

        let Some(joined) = in_flight.join_next().await else {
            // Nothing in flight: finished, stopped by a failure, or stalled.
            if let Some(error) = first_error {
                return Err(error);
            }
            if graph.has_pending() {
                return Err(stall_error(&graph));
            }
            tracing::info!("work graph drained");
            return Ok(());
        };

        match joined {
            Ok((id, Ok(()))) => {
                tracing::debug!(node = %id, "work completed");
                graph.mark_done(&id);
            }
            Ok((id, Err(error))) => {
                tracing::error!(node = %id, error = %error, "work failed");
                graph.mark_failed(&id);
                if first_error.is_none() {
                    first_error = Some(Error::execution_with_source(&id, error));
                }
            }
            Err(join_error) => {
                tracing::error!(error = %join_error, "work task aborted");
                if first_error.is_none() {
                    first_error = Some(Error::execution(
                        "<unknown>",
                        format!("handler task aborted: {join_error}"),
                    ));
                }
            }
        }
    }
}

fn dispatch<H>(
    graph: &mut WorkGraph,
    in_flight: &mut JoinSet<(String, anyhow::Result<()>)>,
    id: String,
    handlers: Arc<H>,
) where
    H: WorkHandlers,
{
    graph.set_state(&id, DeploymentState::Deploying);
    let node = graph.node(&id);
    tracing::debug!(node = %id, kind = node.kind_str(), "dispatching work");
    let kind = node.kind.clone();
    in_flight.spawn(async move {
        let result = match &kind {
            WorkKind::Stack { artifact } => handlers.deploy_stack(artifact).await,
            WorkKind::AssetBuild { file_id, source } => {
                handlers.build_asset(file_id, source).await
            }
            WorkKind::AssetPublish {
                file_id,
                destination_id,
                destination,
            } => {
                handlers
                    .publish_asset(file_id, destination_id, destination)
                    .await
            }
        };
        (id, result)
    });
}

fn stall_error(graph: &WorkGraph) -> Error {
    match graph.find_cycle() {
        Some(cycle) => Error::graph(format!(
            "unable to make progress, dependency cycle between remaining work: {}",
            cycle.join(" -> ")
        )),
        None => Error::graph(
            "unable to make progress, remaining work waits on nodes that will never complete",
        ),
    }
}
