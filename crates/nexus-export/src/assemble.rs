//! Document assembly.
//!
//! Turns a selected node-id set into the export document: one record per
//! node with its properties copied verbatim, and one record per relationship
//! whose both endpoints were selected. Relationships are owned by their
//! start node for output purposes, so each is emitted exactly once; a
//! relationship leaving the selected set marks the surviving endpoint
//! `incomplete` instead.

use std::collections::HashSet;

use serde::Serialize;

use nexus_core::PROPERTY_TYPE;

use crate::snapshot::GraphSnapshot;

pub const EXTRA_ROOT: &str = "root";
pub const EXTRA_INCOMPLETE: &str = "incomplete";

/// The exported graph: `{"nodes": [...], "relationships": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct GraphDocument {
    pub nodes: Vec<DocumentNode>,
    pub relationships: Vec<DocumentRel>,
}

impl GraphDocument {
    /// A document that carries no relationship value (at most the root)
    /// must not be written.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

/// One exported node: id, type, all remaining properties verbatim, and the
/// `extra` flags (`root`, `incomplete`) when any apply.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentNode {
    pub id: i64,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(flatten)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<&'static str>,
}

/// One exported relationship, from the start node's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRel {
    pub id: i64,
    pub from: i64,
    pub to: i64,
    #[serde(rename = "type")]
    pub rel_type: String,
}

/// Assemble the document for one extracted neighborhood.
///
/// Nodes are emitted in ascending id order. A selected node with no
/// parseable type is dropped; by construction that can only be the root,
/// whose singleton document is suppressed anyway.
pub fn assemble(snapshot: &GraphSnapshot, root_id: i64, selected: &HashSet<i64>) -> GraphDocument {
    let mut ids: Vec<i64> = selected.iter().copied().collect();
    ids.sort_unstable();

    let mut nodes = Vec::with_capacity(ids.len());
    let mut relationships = Vec::new();
    let mut emitted: HashSet<i64> = HashSet::new();

    for id in ids {
        let Some(node) = snapshot.node(id) else {
            continue;
        };
        let Some(node_type) = node.type_name() else {
            tracing::debug!(node_id = id, "Dropping selected node without a type");
            continue;
        };

        let mut properties = node.properties.clone();
        properties.remove(PROPERTY_TYPE);

        let mut extra = Vec::new();
        if id == root_id {
            extra.push(EXTRA_ROOT);
        }

        let mut incomplete = false;
        for rel in snapshot.incident(id) {
            if rel.start_id == id {
                // The start node owns the relationship. Exporting only from
                // this side keeps each one out of the document twice.
                if selected.contains(&rel.end_id) {
                    if emitted.insert(rel.id) {
                        relationships.push(DocumentRel {
                            id: rel.id,
                            from: rel.start_id,
                            to: rel.end_id,
                            rel_type: rel.rel_type.clone(),
                        });
                    }
                } else {
                    incomplete = true;
                }
            } else if !selected.contains(&rel.start_id) {
                // Inbound truncation: the owning side is outside the set.
                incomplete = true;
            }
        }
        if incomplete {
            extra.push(EXTRA_INCOMPLETE);
        }

        nodes.push(DocumentNode {
            id,
            node_type: node_type.to_string(),
            properties,
            extra,
        });
    }

    GraphDocument {
        nodes,
        relationships,
    }
}
