//! In-memory index over one store snapshot.
//!
//! Converts the fetched `NodeRecord`/`RelRecord` lists into a dense
//! structure with O(1) node lookup and per-node incident relationship lists
//! (both directions), which the traversal and assembly stages walk without
//! touching the store again.

use std::collections::HashMap;

use nexus_core::{NodeRecord, RelRecord};
use nexus_graph::SnapshotRecords;

/// Indexed snapshot shared by every root extraction in a run.
pub struct GraphSnapshot {
    /// All nodes, indexed by dense position.
    nodes: Vec<NodeRecord>,
    /// Map from store node id to dense position.
    node_index: HashMap<i64, usize>,
    /// All relationships, sorted by relationship id.
    relationships: Vec<RelRecord>,
    /// `incident[i]` = positions in `relationships` touching node `i`,
    /// incoming and outgoing alike. Self-loops appear once.
    incident: Vec<Vec<usize>>,
}

impl GraphSnapshot {
    /// Build the index from fetched records.
    ///
    /// Relationships are sorted by id first, so enumeration order (and with
    /// it sibling-cap truncation) is reproducible for fixed store contents
    /// regardless of fetch order. A relationship referencing a node id
    /// missing from the node list is dropped here.
    pub fn from_records(records: SnapshotRecords) -> Self {
        let SnapshotRecords {
            nodes,
            mut relationships,
        } = records;

        relationships.sort_unstable_by_key(|r| r.id);

        let mut node_index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            node_index.insert(node.id, i);
        }

        let mut incident = vec![Vec::new(); nodes.len()];
        let mut kept = Vec::with_capacity(relationships.len());

        for rel in relationships {
            let (Some(&start), Some(&end)) =
                (node_index.get(&rel.start_id), node_index.get(&rel.end_id))
            else {
                tracing::debug!(rel_id = rel.id, "Dropping relationship with missing endpoint");
                continue;
            };

            let pos = kept.len();
            incident[start].push(pos);
            if start != end {
                incident[end].push(pos);
            }
            kept.push(rel);
        }

        Self {
            nodes,
            node_index,
            relationships: kept,
            incident,
        }
    }

    /// Look up a node by store id.
    pub fn node(&self, node_id: i64) -> Option<&NodeRecord> {
        self.node_index.get(&node_id).map(|&i| &self.nodes[i])
    }

    /// Iterate the relationships incident to a node, both directions.
    /// Unknown node ids yield an empty iterator.
    pub fn incident(&self, node_id: i64) -> impl Iterator<Item = &RelRecord> + '_ {
        self.node_index
            .get(&node_id)
            .into_iter()
            .flat_map(|&i| self.incident[i].iter().map(|&pos| &self.relationships[pos]))
    }

    /// Iterate all nodes in the snapshot.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{node, rel, snapshot, typed};

    #[test]
    fn test_node_lookup() {
        let snap = snapshot(vec![typed(1, "dataset"), typed(2, "grant")], vec![]);
        assert_eq!(snap.node_count(), 2);
        assert_eq!(snap.node(1).unwrap().id, 1);
        assert!(snap.node(99).is_none());
    }

    #[test]
    fn test_incident_covers_both_directions() {
        let snap = snapshot(
            vec![typed(1, "dataset"), typed(2, "grant"), typed(3, "researcher")],
            vec![rel(10, 1, 2), rel(11, 3, 1)],
        );

        let around_1: Vec<i64> = snap.incident(1).map(|r| r.id).collect();
        assert_eq!(around_1, vec![10, 11]);

        let around_2: Vec<i64> = snap.incident(2).map(|r| r.id).collect();
        assert_eq!(around_2, vec![10]);
    }

    #[test]
    fn test_incident_unknown_node_is_empty() {
        let snap = snapshot(vec![typed(1, "dataset")], vec![]);
        assert_eq!(snap.incident(42).count(), 0);
    }

    #[test]
    fn test_dangling_relationship_dropped() {
        let snap = snapshot(vec![typed(1, "dataset")], vec![rel(10, 1, 99)]);
        assert_eq!(snap.relationship_count(), 0);
        assert_eq!(snap.incident(1).count(), 0);
    }

    #[test]
    fn test_self_loop_indexed_once() {
        let snap = snapshot(vec![typed(1, "dataset")], vec![rel(10, 1, 1)]);
        assert_eq!(snap.incident(1).count(), 1);
    }

    #[test]
    fn test_enumeration_order_is_id_sorted() {
        let snap = snapshot(
            vec![typed(1, "dataset"), typed(2, "grant"), typed(3, "researcher")],
            vec![rel(30, 1, 3), rel(10, 1, 2)],
        );
        let order: Vec<i64> = snap.incident(1).map(|r| r.id).collect();
        assert_eq!(order, vec![10, 30]);
    }

    #[test]
    fn test_property_passthrough() {
        let snap = snapshot(
            vec![node(
                1,
                &["ands"],
                serde_json::json!({"type": "dataset", "keys": ["a", "b"]}),
            )],
            vec![],
        );
        let n = snap.node(1).unwrap();
        assert_eq!(n.properties.get("keys"), Some(&serde_json::json!(["a", "b"])));
    }
}
