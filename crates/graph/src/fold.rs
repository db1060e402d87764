use crate::types::{ClusterKind, Dependency, NodeId, ProofGraph, ProofNode};
use std::collections::HashSet;

/// Remove every reference to `id` from a node's adjacency lists, including
/// the clones stored inside nested pi-nodes.
fn strip_reference(node: &mut ProofNode, id: NodeId) {
    node.children.retain(|&c| c != id);
    node.parents.retain(|&p| p != id);
    if let Some(hidden) = node.hidden_nodes.as_mut() {
        for inner in hidden {
            strip_reference(inner, id);
        }
    }
}

fn merge_dependency(ledger: &mut Vec<Dependency>, dep: Dependency) {
    match ledger.iter_mut().find(|d| d.pi_id == dep.pi_id) {
        Some(existing) => existing.deps_id.extend(dep.deps_id),
        None => ledger.push(dep),
    }
}

impl ProofGraph {
    /// Boundary parents a pi-node collapsing `hidden` must expose upward,
    /// together with the dependency ledger for later justification lookups.
    ///
    /// The boundary is exactly the set of parents of hidden nodes that are
    /// not themselves hidden, deduplicated in first-encounter order. The
    /// ledger records, per external parent, which hidden nodes it cited.
    #[must_use]
    pub fn pi_node_parents(&self, hidden: &[NodeId]) -> (Vec<NodeId>, Vec<Dependency>) {
        let hidden_set: HashSet<NodeId> = hidden.iter().copied().collect();
        let mut boundary = Vec::new();
        let mut ledger: Vec<Dependency> = Vec::new();

        for &h in hidden {
            let Some(node) = self.node(h) else { continue };
            for &parent in &node.parents {
                if hidden_set.contains(&parent) {
                    continue;
                }
                if !boundary.contains(&parent) {
                    boundary.push(parent);
                }
                merge_dependency(
                    &mut ledger,
                    Dependency {
                        pi_id: parent,
                        deps_id: vec![h],
                    },
                );
            }
        }

        (boundary, ledger)
    }

    /// Boundary children a pi-node collapsing `hidden` must expose downward:
    /// the union of the hidden nodes' children minus the hidden set itself.
    #[must_use]
    pub fn pi_node_children(&self, hidden: &[NodeId]) -> Vec<NodeId> {
        let hidden_set: HashSet<NodeId> = hidden.iter().copied().collect();
        let mut boundary = Vec::new();

        for &h in hidden {
            let Some(node) = self.node(h) else { continue };
            for &child in &node.children {
                if !hidden_set.contains(&child) && !boundary.contains(&child) {
                    boundary.push(child);
                }
            }
        }

        boundary
    }

    /// All nodes reachable from `id` through visible children, flattened.
    ///
    /// Hidden nodes are skipped, not re-expanded. The result is not
    /// deduplicated: the DAG may reconverge, and callers folding the result
    /// treat duplicate hide requests as idempotent.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.node(id) else { return };
        for &child in &node.children {
            let Some(child_node) = self.node(child) else {
                continue;
            };
            if child_node.is_hidden {
                continue;
            }
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Merge the dependency ledgers already carried by `hidden` nodes, for
    /// attachment to a new, coarser pi-node. Entries are merged by `pi_id`:
    /// the first occurrence is kept, later ones append their `deps_id`.
    #[must_use]
    pub fn group_dependencies(&self, hidden: &[NodeId]) -> Vec<Dependency> {
        let hidden_set: HashSet<NodeId> = hidden.iter().copied().collect();
        let mut merged: Vec<Dependency> = Vec::new();

        for node in self.iter() {
            if !hidden_set.contains(&node.id) || node.dependencies.is_empty() {
                continue;
            }
            for dep in &node.dependencies {
                merge_dependency(&mut merged, dep.clone());
            }
        }

        merged
    }

    /// Collapse `hidden` into a new pi-node and return its id.
    ///
    /// The request must name at least two distinct, existing, visible nodes;
    /// anything else cannot apply cleanly and is a no-op returning `None`.
    pub fn fold(&mut self, hidden: &[NodeId]) -> Option<NodeId> {
        let mut set: Vec<NodeId> = Vec::new();
        for &id in hidden {
            if !set.contains(&id) {
                set.push(id);
            }
        }
        if set.len() < 2 {
            return None;
        }
        for &id in &set {
            match self.node(id) {
                Some(node) if !node.is_hidden => {}
                _ => {
                    log::debug!("fold request rejected: node {id} missing or already hidden");
                    return None;
                }
            }
        }

        let hidden_set: HashSet<NodeId> = set.iter().copied().collect();
        let (boundary_parents, fresh_deps) = self.pi_node_parents(&set);
        let boundary_children = self.pi_node_children(&set);

        let mut dependencies = self.group_dependencies(&set);
        for dep in fresh_deps {
            merge_dependency(&mut dependencies, dep);
        }

        // The summary conclusion comes from the topmost hidden node, the one
        // none of whose parents are being folded with it.
        let top = set
            .iter()
            .copied()
            .find(|&id| {
                self.node(id)
                    .is_some_and(|n| n.parents.iter().all(|p| !hidden_set.contains(p)))
            })
            .unwrap_or(set[0]);
        let conclusion = self.node(top)?.conclusion.clone();

        let originals: Vec<ProofNode> = set.iter().filter_map(|&id| self.node(id).cloned()).collect();

        let pi = ProofNode {
            id: self.len(),
            conclusion,
            rule: "π".to_string(),
            args: String::new(),
            children: boundary_children.clone(),
            parents: boundary_parents.clone(),
            descendants: set.len(),
            is_hidden: false,
            hidden_nodes: Some(originals),
            dependencies,
            cluster_type: ClusterKind::None,
        };
        let pi_id = self.push(pi);

        for &id in &set {
            if let Some(node) = self.node_mut(id) {
                node.is_hidden = true;
            }
        }
        // Mirror the boundary edges so parent/child symmetry holds for the
        // whole table; unfold strips these again.
        for &parent in &boundary_parents {
            if let Some(node) = self.node_mut(parent) {
                node.children.push(pi_id);
            }
        }
        for &child in &boundary_children {
            if let Some(node) = self.node_mut(child) {
                node.parents.push(pi_id);
            }
        }

        log::debug!("folded {} nodes into pi-node {pi_id}", set.len());
        Some(pi_id)
    }

    /// Restore the originals collapsed under `pi_id` and remove the pi-node.
    ///
    /// Returns `false` without mutating anything when `pi_id` does not name
    /// a visible pi-node.
    pub fn unfold(&mut self, pi_id: NodeId) -> bool {
        let originals = match self.node(pi_id) {
            Some(pi) if !pi.is_hidden => match pi.hidden_nodes.clone() {
                Some(originals) => originals,
                None => return false,
            },
            _ => return false,
        };

        for original in originals {
            let id = original.id;
            if let Some(slot) = self.node_mut(id) {
                *slot = ProofNode {
                    is_hidden: false,
                    ..original
                };
            }
        }
        self.vacate(pi_id);
        for node in self.iter_mut() {
            strip_reference(node, pi_id);
        }

        log::debug!("unfolded pi-node {pi_id}");
        true
    }

    /// Fold a node together with everything visible beneath it.
    pub fn fold_descendants(&mut self, id: NodeId) -> Option<NodeId> {
        let mut set = vec![id];
        for descendant in self.descendants(id) {
            if !set.contains(&descendant) {
                set.push(descendant);
            }
        }
        self.fold(&set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClusterColorMap, LetMap};
    use pretty_assertions::assert_eq;

    /// Builds nodes from `(id, children)` pairs and derives the parents.
    fn graph_from_edges(layout: &[(NodeId, &[NodeId])]) -> ProofGraph {
        let mut nodes: Vec<ProofNode> = layout
            .iter()
            .map(|&(id, children)| ProofNode {
                conclusion: format!("c{id}"),
                rule: "rule".to_string(),
                children: children.to_vec(),
                ..ProofNode::placeholder(id)
            })
            .collect();
        let edges: Vec<(NodeId, NodeId)> = nodes
            .iter()
            .flat_map(|n| n.children.iter().map(move |&c| (n.id, c)))
            .collect();
        for (parent, child) in edges {
            nodes[child].parents.push(parent);
        }
        ProofGraph::new(nodes, LetMap::new(), ClusterColorMap::new())
    }

    #[test]
    fn boundary_parents_and_ledger() {
        // 0 -> 2, 1 -> 3, 2 -> 3 (children point downward)
        let graph = graph_from_edges(&[(0, &[2]), (1, &[3]), (2, &[3]), (3, &[])]);
        let (parents, deps) = graph.pi_node_parents(&[2, 3]);

        assert_eq!(parents, vec![0, 1]);
        assert_eq!(
            deps,
            vec![
                Dependency { pi_id: 0, deps_id: vec![2] },
                Dependency { pi_id: 1, deps_id: vec![3] },
            ]
        );
    }

    #[test]
    fn boundary_parents_disjoint_from_hidden_set() {
        let graph = graph_from_edges(&[(0, &[1]), (1, &[2]), (2, &[3]), (3, &[])]);
        let hidden = vec![1, 2];
        let (parents, _) = graph.pi_node_parents(&hidden);

        assert!(parents.iter().all(|p| !hidden.contains(p)));
        assert_eq!(parents, vec![0]);
    }

    #[test]
    fn boundary_children_excludes_hidden() {
        let graph = graph_from_edges(&[(0, &[1, 2]), (1, &[3]), (2, &[3]), (3, &[])]);
        assert_eq!(graph.pi_node_children(&[1, 2]), vec![3]);
    }

    #[test]
    fn descendants_skip_hidden_subtrees() {
        let mut graph = graph_from_edges(&[(0, &[1, 2]), (1, &[3]), (2, &[]), (3, &[])]);
        assert_eq!(graph.descendants(0), vec![1, 3, 2]);

        graph.node_mut(1).expect("node").is_hidden = true;
        assert_eq!(graph.descendants(0), vec![2]);
    }

    #[test]
    fn descendants_keep_reconvergent_duplicates() {
        let graph = graph_from_edges(&[(0, &[1, 2]), (1, &[3]), (2, &[3]), (3, &[])]);
        assert_eq!(graph.descendants(0), vec![1, 3, 2, 3]);
    }

    #[test]
    fn node_never_among_its_own_descendants() {
        let graph = graph_from_edges(&[(0, &[1, 2]), (1, &[3]), (2, &[3]), (3, &[])]);
        for node in graph.iter() {
            assert!(!graph.descendants(node.id).contains(&node.id));
        }
    }

    #[test]
    fn fold_then_unfold_restores_visible_set() {
        let mut graph = graph_from_edges(&[(0, &[1]), (1, &[2, 3]), (2, &[]), (3, &[])]);
        let before: Vec<NodeId> = graph.visible().map(|n| n.id).collect();

        let pi = graph.fold(&[2, 3]).expect("fold applies");
        assert!(graph.node(2).expect("node").is_hidden);
        assert!(graph.node(3).expect("node").is_hidden);
        assert_eq!(graph.node(pi).map(|n| n.rule.as_str()), Some("π"));
        assert!(graph.validate().is_ok());

        assert!(graph.unfold(pi));
        let after: Vec<NodeId> = graph.visible().map(|n| n.id).collect();
        assert_eq!(before, after);
        assert!(graph.node(pi).is_none());
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn fold_wires_boundary_edges() {
        let mut graph = graph_from_edges(&[(0, &[1]), (1, &[2, 3]), (2, &[4]), (3, &[4]), (4, &[])]);
        let pi = graph.fold(&[2, 3]).expect("fold applies");

        let pi_node = graph.node(pi).expect("pi node");
        assert_eq!(pi_node.parents, vec![1]);
        assert_eq!(pi_node.children, vec![4]);
        assert!(graph.node(1).expect("node").children.contains(&pi));
        assert!(graph.node(4).expect("node").parents.contains(&pi));
    }

    #[test]
    fn fold_rejects_structurally_invalid_requests() {
        let mut graph = graph_from_edges(&[(0, &[1]), (1, &[])]);

        assert_eq!(graph.fold(&[0, 99]), None);
        assert_eq!(graph.fold(&[1]), None);
        assert_eq!(graph.fold(&[1, 1]), None);

        let mut folded = graph_from_edges(&[(0, &[1]), (1, &[2]), (2, &[])]);
        folded.node_mut(2).expect("node").is_hidden = true;
        assert_eq!(folded.fold(&[1, 2]), None);
    }

    #[test]
    fn unfold_rejects_non_pi_targets() {
        let mut graph = graph_from_edges(&[(0, &[1]), (1, &[])]);
        assert!(!graph.unfold(0));
        assert!(!graph.unfold(42));
    }

    #[test]
    fn refold_merges_prior_dependency_ledgers() {
        let mut graph =
            graph_from_edges(&[(0, &[1]), (1, &[2, 3]), (2, &[4]), (3, &[4]), (4, &[])]);

        let first = graph.fold(&[2, 3]).expect("first fold");
        let ledger = graph.node(first).expect("pi").dependencies.clone();
        assert_eq!(ledger, vec![Dependency { pi_id: 1, deps_id: vec![2, 3] }]);

        // Folding the pi-node again at a coarser granularity keeps the
        // prior ledger entry and appends the pi-node itself to it.
        let second = graph.fold(&[first, 4]).expect("second fold");
        let merged = &graph.node(second).expect("pi").dependencies;
        assert!(merged
            .iter()
            .any(|d| d.pi_id == 1 && d.deps_id.starts_with(&[2, 3])));
    }

    #[test]
    fn group_dependencies_merges_by_pi_id() {
        let mut graph = graph_from_edges(&[(0, &[1, 2]), (1, &[]), (2, &[])]);
        graph.node_mut(1).expect("node").dependencies =
            vec![Dependency { pi_id: 7, deps_id: vec![10] }];
        graph.node_mut(2).expect("node").dependencies = vec![
            Dependency { pi_id: 7, deps_id: vec![11] },
            Dependency { pi_id: 8, deps_id: vec![12] },
        ];

        assert_eq!(
            graph.group_dependencies(&[1, 2]),
            vec![
                Dependency { pi_id: 7, deps_id: vec![10, 11] },
                Dependency { pi_id: 8, deps_id: vec![12] },
            ]
        );
    }

    #[test]
    fn fold_descendants_collapses_subtree() {
        let mut graph = graph_from_edges(&[(0, &[1]), (1, &[2, 3]), (2, &[]), (3, &[])]);
        let pi = graph.fold_descendants(1).expect("fold applies");

        for id in [1, 2, 3] {
            assert!(graph.node(id).expect("node").is_hidden);
        }
        assert_eq!(graph.node(pi).expect("pi").parents, vec![0]);
        assert!(graph.node(pi).expect("pi").children.is_empty());
    }
}
