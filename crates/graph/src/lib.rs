//! Work graph construction and parallel execution for skylift
//!
//! This crate is the heart of skylift: it turns a flattened cloud assembly
//! into a typed work graph (stack deploys, asset builds, asset publishes)
//! and drains that graph with bounded concurrency while honoring every
//! ordering constraint between builds, publishes, and deployments.

pub mod builder;
pub mod executor;
pub mod graph;
pub mod node;
pub mod options;

pub use builder::GraphBuilder;
pub use executor::{execute, WorkHandlers};
pub use graph::WorkGraph;
pub use node::{DeploymentState, WorkKind, WorkNode};
pub use options::DeployOptions;
