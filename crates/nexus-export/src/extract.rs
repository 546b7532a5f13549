//! Bounded neighborhood extraction.
//!
//! Breadth-first traversal from one root under three independent caps:
//! depth (`max_level`), a global node budget (`max_nodes`), and a per-parent
//! fan-out cap on the next wave (`max_siblings`). A single visited set spans
//! the whole traversal, so cycles terminate and no node is admitted twice.

use std::collections::HashSet;

use nexus_core::{ExtractionLimits, NodeKind};

use crate::snapshot::GraphSnapshot;

/// Extract the node-id set of the bounded neighborhood around `root_id`.
///
/// The root is always selected, whatever its own kind. Endpoints without a
/// parseable kind are never admitted, and `institution` nodes are excluded
/// from traversal entirely. Truncation order under `max_siblings` follows
/// the snapshot's relationship enumeration order, which the adapter keeps
/// deterministic.
pub fn extract_neighborhood(
    snapshot: &GraphSnapshot,
    root_id: i64,
    limits: &ExtractionLimits,
) -> HashSet<i64> {
    let mut selected = HashSet::new();
    selected.insert(root_id);

    if limits.node_budget_reached(selected.len()) {
        return selected;
    }

    let mut frontier = vec![root_id];
    let mut depth = 0;

    while depth < limits.max_level && !frontier.is_empty() {
        let mut next_wave = Vec::new();

        for &parent_id in &frontier {
            // Untyped parents are not expanded; the root may be one.
            let expandable = snapshot.node(parent_id).is_some_and(|n| n.kind().is_some());
            if !expandable {
                continue;
            }

            let mut admitted = 0u32;
            for rel in snapshot.incident(parent_id) {
                let other_id = rel.other(parent_id);
                if selected.contains(&other_id) {
                    continue;
                }

                match snapshot.node(other_id).and_then(|n| n.kind()) {
                    None | Some(NodeKind::Institution) => continue,
                    Some(_) => {}
                }

                selected.insert(other_id);
                if limits.node_budget_reached(selected.len()) {
                    // Hard global budget: abort the whole traversal.
                    return selected;
                }

                if limits.sibling_allowed(admitted) {
                    next_wave.push(other_id);
                    admitted += 1;
                }
            }
        }

        frontier = next_wave;
        depth += 1;
    }

    selected
}
