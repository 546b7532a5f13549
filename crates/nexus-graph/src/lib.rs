//! nexus-graph: Read-only Neo4j store adapter for the Nexus exporter.
//!
//! The exporter never writes to the store. This crate opens a connection,
//! materializes one consistent snapshot of nodes and relationships per run,
//! and fetches single nodes by store id for test-node runs.

pub mod client;
pub mod queries;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use queries::SnapshotRecords;
