//! Limits bounding the neighborhood extracted around one root node.

use serde::{Deserialize, Serialize};

/// Three independent caps applied during a single traversal pass.
///
/// For `max_nodes` and `max_siblings`, 0 disables the cap; it never means
/// "admit nothing". `max_level` is the traversal depth itself, so 0 keeps
/// the extraction at the root alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtractionLimits {
    /// BFS depth: the deepest selected node sits at this distance from the
    /// root. 0 = root only.
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Global node budget for one extracted subgraph, root included.
    /// 0 = unlimited. Enforced after every admission; hitting it aborts the
    /// whole traversal, not just the current wave.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u32,

    /// How many newly discovered children each parent may carry into the
    /// next wave. 0 = unlimited. Resets per parent per wave.
    #[serde(default = "default_max_siblings")]
    pub max_siblings: u32,
}

fn default_max_level() -> u32 {
    2
}

fn default_max_nodes() -> u32 {
    100
}

fn default_max_siblings() -> u32 {
    10
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_level: default_max_level(),
            max_nodes: default_max_nodes(),
            max_siblings: default_max_siblings(),
        }
    }
}

impl ExtractionLimits {
    /// Unlimited in every dimension except depth.
    pub fn with_level(max_level: u32) -> Self {
        Self {
            max_level,
            max_nodes: 0,
            max_siblings: 0,
        }
    }

    /// Whether `selected` nodes exhaust the global budget.
    pub fn node_budget_reached(&self, selected: usize) -> bool {
        self.max_nodes > 0 && selected >= self.max_nodes as usize
    }

    /// Whether a parent that admitted `admitted` children this wave may
    /// admit another.
    pub fn sibling_allowed(&self, admitted: u32) -> bool {
        self.max_siblings == 0 || admitted < self.max_siblings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = ExtractionLimits::default();
        assert_eq!(limits.max_level, 2);
        assert_eq!(limits.max_nodes, 100);
        assert_eq!(limits.max_siblings, 10);
    }

    #[test]
    fn test_zero_disables_budget() {
        let limits = ExtractionLimits {
            max_level: 1,
            max_nodes: 0,
            max_siblings: 0,
        };
        assert!(!limits.node_budget_reached(1_000_000));
        assert!(limits.sibling_allowed(u32::MAX - 1));
    }

    #[test]
    fn test_budget_boundaries() {
        let limits = ExtractionLimits {
            max_level: 1,
            max_nodes: 3,
            max_siblings: 2,
        };
        assert!(!limits.node_budget_reached(2));
        assert!(limits.node_budget_reached(3));
        assert!(limits.node_budget_reached(4));

        assert!(limits.sibling_allowed(0));
        assert!(limits.sibling_allowed(1));
        assert!(!limits.sibling_allowed(2));
    }

    #[test]
    fn test_deserialize_defaults() {
        let limits: ExtractionLimits = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(limits.max_level, 2);
        assert_eq!(limits.max_nodes, 100);
        assert_eq!(limits.max_siblings, 10);
    }
}
