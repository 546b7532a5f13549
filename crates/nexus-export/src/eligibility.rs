//! Root eligibility checks.
//!
//! A node qualifies for export when at least one source rule matches it in
//! full: label, identifying property, kind restriction, and linked-source
//! restriction. Rules combine disjunctively; the conditions within one rule
//! conjunctively.

use nexus_core::{NodeRecord, SourceRule};

use crate::snapshot::GraphSnapshot;

/// Whether any rule qualifies this node as an export root.
pub fn is_eligible(node: &NodeRecord, snapshot: &GraphSnapshot, rules: &[SourceRule]) -> bool {
    rules.iter().any(|rule| {
        rule.applies_to(node) && rule.allows_kind(node) && has_linked_source(node, snapshot, rule)
    })
}

/// The linked-source restriction: the node must have at least one incident
/// relationship whose other endpoint carries one of the restricted labels.
/// An empty restriction passes. Short-circuits on the first match.
fn has_linked_source(node: &NodeRecord, snapshot: &GraphSnapshot, rule: &SourceRule) -> bool {
    if rule.linked_sources.is_empty() {
        return true;
    }

    snapshot.incident(node.id).any(|rel| {
        let other_id = rel.other(node.id);
        snapshot
            .node(other_id)
            .is_some_and(|other| rule.linked_sources.iter().any(|label| other.has_label(label)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{node, rel, snapshot};
    use nexus_core::NodeKind;

    fn rule(label: &str, key: &str) -> SourceRule {
        SourceRule {
            label: label.to_string(),
            key_property: key.to_string(),
            types: vec![],
            linked_sources: vec![],
        }
    }

    #[test]
    fn test_label_and_key_required() {
        let snap = snapshot(
            vec![node(1, &["ands"], serde_json::json!({"local_id": "a1"}))],
            vec![],
        );
        let n = snap.node(1).unwrap();

        assert!(is_eligible(n, &snap, &[rule("ands", "local_id")]));
        assert!(!is_eligible(n, &snap, &[rule("dryad", "local_id")]));
        assert!(!is_eligible(n, &snap, &[rule("ands", "doi")]));
        assert!(!is_eligible(n, &snap, &[]));
    }

    #[test]
    fn test_type_restriction() {
        let snap = snapshot(
            vec![node(
                1,
                &["ands"],
                serde_json::json!({"local_id": "a1", "type": "grant"}),
            )],
            vec![],
        );
        let n = snap.node(1).unwrap();

        let mut restricted = rule("ands", "local_id");
        restricted.types = vec![NodeKind::Dataset];
        assert!(!is_eligible(n, &snap, &[restricted.clone()]));

        restricted.types = vec![NodeKind::Dataset, NodeKind::Grant];
        assert!(is_eligible(n, &snap, &[restricted]));
    }

    #[test]
    fn test_linked_source_restriction() {
        let snap = snapshot(
            vec![
                node(1, &["dryad"], serde_json::json!({"local_id": "d1"})),
                node(2, &["crossref"], serde_json::json!({})),
                node(3, &["web"], serde_json::json!({})),
            ],
            vec![rel(10, 1, 3), rel(11, 2, 1)],
        );
        let n = snap.node(1).unwrap();

        let mut linked = rule("dryad", "local_id");
        linked.linked_sources = vec!["crossref".to_string()];
        assert!(is_eligible(n, &snap, &[linked.clone()]));

        linked.linked_sources = vec!["orcid".to_string()];
        assert!(!is_eligible(n, &snap, &[linked]));
    }

    #[test]
    fn test_linked_source_requires_a_relationship() {
        let snap = snapshot(
            vec![node(1, &["cern"], serde_json::json!({"local_id": "c1"}))],
            vec![],
        );
        let n = snap.node(1).unwrap();

        let mut linked = rule("cern", "local_id");
        linked.linked_sources = vec!["ands".to_string()];
        assert!(!is_eligible(n, &snap, &[linked]));
    }

    #[test]
    fn test_any_rule_qualifies() {
        let snap = snapshot(
            vec![node(1, &["orcid"], serde_json::json!({"orcid": "0000-1"}))],
            vec![],
        );
        let n = snap.node(1).unwrap();

        let rules = vec![rule("ands", "local_id"), rule("orcid", "orcid")];
        assert!(is_eligible(n, &snap, &rules));
    }
}
