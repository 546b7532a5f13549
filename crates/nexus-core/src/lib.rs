//! nexus-core: Shared domain types for the Nexus graph exporter.
//!
//! This crate provides the types used across the exporter components:
//! - Node/relationship snapshot records as read from the graph store
//! - The closed set of node kinds carried in the `type` property
//! - Per-source eligibility and naming rules
//! - Extraction limits for the bounded neighborhood traversal

pub mod limits;
pub mod rules;
pub mod types;

pub use limits::ExtractionLimits;
pub use rules::SourceRule;
pub use types::{NodeKind, NodeRecord, RelRecord, PROPERTY_TYPE};
