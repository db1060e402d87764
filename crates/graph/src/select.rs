use crate::types::{NodeId, ProofGraph};
use regex::Regex;

/// Selection predicates feeding the view layer's selection state. All of
/// them are pure filters over the visible nodes; patterns are compiled (and
/// therefore validated) by the caller before they reach the graph.
impl ProofGraph {
    /// Visible nodes using exactly this rule.
    #[must_use]
    pub fn select_by_rule(&self, rule: &str) -> Vec<NodeId> {
        self.visible()
            .filter(|n| n.rule == rule)
            .map(|n| n.id)
            .collect()
    }

    /// Visible nodes whose conclusion matches the pattern.
    #[must_use]
    pub fn select_by_regex(&self, pattern: &Regex) -> Vec<NodeId> {
        self.visible()
            .filter(|n| pattern.is_match(&n.conclusion))
            .map(|n| n.id)
            .collect()
    }

    /// The subset of `ids` naming existing, visible nodes.
    #[must_use]
    pub fn select_by_ids(&self, ids: &[NodeId]) -> Vec<NodeId> {
        ids.iter()
            .copied()
            .filter(|&id| self.node(id).is_some_and(|n| !n.is_hidden))
            .collect()
    }
}
