//! Document key derivation.
//!
//! Every matching source rule contributes one key per identifier value found
//! in the node's identifying property, shaped `<label>/<encoded id>.json`.
//! Identifiers are percent-encoded so they stay path- and URL-safe as object
//! keys; a node matching no rule yields an empty set and is skipped upstream.

use std::collections::BTreeSet;

use url::form_urlencoded;

use nexus_core::{NodeRecord, SourceRule};

/// Derive the set of document keys for one node.
///
/// A string identifier produces one key, an array one key per string
/// element. Non-string values are skipped without failing the node.
pub fn document_names(node: &NodeRecord, rules: &[SourceRule]) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for rule in rules {
        if !rule.applies_to(node) {
            continue;
        }

        match node.properties.get(&rule.key_property) {
            Some(serde_json::Value::String(identifier)) => {
                names.insert(make_name(&rule.label, identifier));
            }
            Some(serde_json::Value::Array(identifiers)) => {
                for identifier in identifiers {
                    if let serde_json::Value::String(identifier) = identifier {
                        names.insert(make_name(&rule.label, identifier));
                    }
                }
            }
            _ => {}
        }
    }

    names
}

fn make_name(label: &str, identifier: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(identifier.as_bytes()).collect();
    format!("{label}/{encoded}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::node;

    fn rule(label: &str, key: &str) -> SourceRule {
        SourceRule {
            label: label.to_string(),
            key_property: key.to_string(),
            types: vec![],
            linked_sources: vec![],
        }
    }

    #[test]
    fn test_scalar_identifier() {
        let n = node(1, &["ands"], serde_json::json!({"local_id": "a-1"}));
        let names = document_names(&n, &[rule("ands", "local_id")]);
        assert_eq!(names, BTreeSet::from(["ands/a-1.json".to_string()]));
    }

    #[test]
    fn test_identifier_is_percent_encoded() {
        let n = node(1, &["dara"], serde_json::json!({"doi": "abc/def"}));
        let names = document_names(&n, &[rule("dara", "doi")]);
        assert_eq!(names, BTreeSet::from(["dara/abc%2Fdef.json".to_string()]));
    }

    #[test]
    fn test_array_identifier_produces_one_name_each() {
        let n = node(1, &["ands"], serde_json::json!({"local_id": ["a", "b"]}));
        let names = document_names(&n, &[rule("ands", "local_id")]);
        assert_eq!(
            names,
            BTreeSet::from(["ands/a.json".to_string(), "ands/b.json".to_string()])
        );
    }

    #[test]
    fn test_multiple_rules_accumulate() {
        let n = node(
            1,
            &["ands", "dara"],
            serde_json::json!({"local_id": "a-1", "doi": "10.1/x"}),
        );
        let names = document_names(&n, &[rule("ands", "local_id"), rule("dara", "doi")]);
        assert_eq!(names.len(), 2);
        assert!(names.contains("dara/10.1%2Fx.json"));
    }

    #[test]
    fn test_no_match_is_empty() {
        let n = node(1, &["web"], serde_json::json!({"url": "http://x"}));
        assert!(document_names(&n, &[rule("ands", "local_id")]).is_empty());
        assert!(document_names(&n, &[]).is_empty());
    }

    #[test]
    fn test_non_string_identifiers_skipped() {
        let n = node(1, &["ands"], serde_json::json!({"local_id": 42}));
        assert!(document_names(&n, &[rule("ands", "local_id")]).is_empty());

        let mixed = node(1, &["ands"], serde_json::json!({"local_id": ["a", 7, null]}));
        let names = document_names(&mixed, &[rule("ands", "local_id")]);
        assert_eq!(names, BTreeSet::from(["ands/a.json".to_string()]));
    }

    #[test]
    fn test_duplicate_identifiers_deduplicated() {
        let n = node(1, &["ands"], serde_json::json!({"local_id": ["a", "a"]}));
        let names = document_names(&n, &[rule("ands", "local_id")]);
        assert_eq!(names.len(), 1);
    }
}
