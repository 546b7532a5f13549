//! Per-source export rules.
//!
//! Each rule describes one label category of exportable records: which
//! property identifies a record to the outside world, and optional
//! restrictions on the record's kind and on the sources it must be linked to.

use serde::{Deserialize, Serialize};

use crate::types::{NodeKind, NodeRecord};

/// Configuration for one exportable label category.
///
/// Loaded once per run from the `[[export.sources]]` config entries and
/// treated as read-only. Empty restriction lists mean "unrestricted".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRule {
    /// The source label this rule applies to (e.g. `ands`, `orcid`).
    pub label: String,

    /// The property holding the record's external identifier(s).
    pub key_property: String,

    /// If non-empty, the node's kind must be one of these.
    #[serde(default)]
    pub types: Vec<NodeKind>,

    /// If non-empty, the node must be linked to at least one node carrying
    /// one of these labels.
    #[serde(default)]
    pub linked_sources: Vec<String>,
}

impl SourceRule {
    /// Whether the node carries this rule's label and identifying property.
    ///
    /// This is the rule-local part of eligibility; the relationship-dependent
    /// linked-source check lives with the eligibility filter, which has
    /// access to the node's neighborhood.
    pub fn applies_to(&self, node: &NodeRecord) -> bool {
        node.has_label(&self.label) && node.properties.contains_key(&self.key_property)
    }

    /// Whether the node's kind satisfies this rule's type restriction.
    pub fn allows_kind(&self, node: &NodeRecord) -> bool {
        if self.types.is_empty() {
            return true;
        }
        node.kind().is_some_and(|kind| self.types.contains(&kind))
    }
}
