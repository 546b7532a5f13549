//! Core record types for the Nexus research graph.
//!
//! `NodeRecord` and `RelRecord` are immutable snapshots of store entities,
//! shared between the store adapter (which produces them) and the export
//! engine (which indexes and traverses them).

use serde::{Deserialize, Serialize};

// ── Node Kinds ────────────────────────────────────────────────────

/// The closed set of record kinds carried in a node's `type` property.
///
/// Anything outside this set (or a missing `type`) is treated as untyped:
/// such nodes are never admitted into an extracted neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Dataset,
    Grant,
    Researcher,
    Publication,
    Institution,
    Service,
    Pattern,
    Version,
}

impl NodeKind {
    /// Parse a `type` property value. Returns `None` for unknown kinds.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dataset" => Some(Self::Dataset),
            "grant" => Some(Self::Grant),
            "researcher" => Some(Self::Researcher),
            "publication" => Some(Self::Publication),
            "institution" => Some(Self::Institution),
            "service" => Some(Self::Service),
            "pattern" => Some(Self::Pattern),
            "version" => Some(Self::Version),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Grant => "grant",
            Self::Researcher => "researcher",
            Self::Publication => "publication",
            Self::Institution => "institution",
            Self::Service => "service",
            Self::Pattern => "pattern",
            Self::Version => "version",
        }
    }
}

// ── Store Records ─────────────────────────────────────────────────

/// The property name that carries a node's kind.
pub const PROPERTY_TYPE: &str = "type";

/// A node as read from the graph store.
///
/// `id` is the store's stable 64-bit node id. Property values are scalars
/// or arrays of scalars and are copied verbatim into export documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl NodeRecord {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// The raw `type` property value, if it is a string.
    pub fn type_name(&self) -> Option<&str> {
        self.properties.get(PROPERTY_TYPE).and_then(|v| v.as_str())
    }

    /// The node's kind, if its `type` property names one of the closed set.
    pub fn kind(&self) -> Option<NodeKind> {
        self.type_name().and_then(NodeKind::parse)
    }
}

/// A directed relationship as read from the graph store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelRecord {
    pub id: i64,
    pub rel_type: String,
    pub start_id: i64,
    pub end_id: i64,
}

impl RelRecord {
    /// The endpoint opposite to `node_id`. For a self-loop both endpoints
    /// coincide and the same id comes back.
    pub fn other(&self, node_id: i64) -> i64 {
        if self.start_id == node_id {
            self.end_id
        } else {
            self.start_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_known() {
        assert_eq!(NodeKind::parse("dataset"), Some(NodeKind::Dataset));
        assert_eq!(NodeKind::parse("institution"), Some(NodeKind::Institution));
        assert_eq!(NodeKind::parse("version"), Some(NodeKind::Version));
    }

    #[test]
    fn test_kind_parse_unknown() {
        assert_eq!(NodeKind::parse(""), None);
        assert_eq!(NodeKind::parse("Dataset"), None);
        assert_eq!(NodeKind::parse("spreadsheet"), None);
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            NodeKind::Dataset,
            NodeKind::Grant,
            NodeKind::Researcher,
            NodeKind::Publication,
            NodeKind::Institution,
            NodeKind::Service,
            NodeKind::Pattern,
            NodeKind::Version,
        ] {
            assert_eq!(NodeKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_node_record_kind() {
        let mut properties = serde_json::Map::new();
        properties.insert("type".to_string(), serde_json::json!("researcher"));
        let node = NodeRecord {
            id: 7,
            labels: vec!["orcid".to_string()],
            properties,
        };
        assert_eq!(node.kind(), Some(NodeKind::Researcher));
        assert!(node.has_label("orcid"));
        assert!(!node.has_label("ands"));
    }

    #[test]
    fn test_node_record_untyped() {
        let node = NodeRecord {
            id: 7,
            labels: vec![],
            properties: serde_json::Map::new(),
        };
        assert_eq!(node.type_name(), None);
        assert_eq!(node.kind(), None);

        // A non-string type is as good as no type.
        let mut properties = serde_json::Map::new();
        properties.insert("type".to_string(), serde_json::json!(42));
        let node = NodeRecord {
            id: 8,
            labels: vec![],
            properties,
        };
        assert_eq!(node.kind(), None);
    }

    #[test]
    fn test_rel_other_endpoint() {
        let rel = RelRecord {
            id: 1,
            rel_type: "relatedTo".to_string(),
            start_id: 10,
            end_id: 20,
        };
        assert_eq!(rel.other(10), 20);
        assert_eq!(rel.other(20), 10);

        let self_loop = RelRecord {
            id: 2,
            rel_type: "relatedTo".to_string(),
            start_id: 5,
            end_id: 5,
        };
        assert_eq!(self_loop.other(5), 5);
    }
}
