use crate::error::{GraphError, Result};
use crate::types::{ClusterColorMap, LetMap, NodeId, ProofNode, ProofGraph};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use std::collections::HashMap;

impl ProofGraph {
    /// Build a graph from a parsed node table and its certificate metadata.
    #[must_use]
    pub fn new(nodes: Vec<ProofNode>, let_map: LetMap, cluster_colors: ClusterColorMap) -> Self {
        Self {
            nodes: nodes.into_iter().map(Some).collect(),
            let_map,
            cluster_colors,
        }
    }

    /// Number of slots in the node table, including vacated ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&ProofNode> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ProofNode> {
        self.nodes.get_mut(id).and_then(Option::as_mut)
    }

    /// The proof root: the final conclusion, always slot 0 in both formats.
    #[must_use]
    pub fn root(&self) -> Option<&ProofNode> {
        self.node(0)
    }

    /// All nodes, hidden ones included.
    pub fn iter(&self) -> impl Iterator<Item = &ProofNode> {
        self.nodes.iter().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ProofNode> {
        self.nodes.iter_mut().flatten()
    }

    /// Nodes currently visible (not folded away).
    pub fn visible(&self) -> impl Iterator<Item = &ProofNode> {
        self.iter().filter(|n| !n.is_hidden)
    }

    /// Append a node at the next free id.
    pub(crate) fn push(&mut self, node: ProofNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(node));
        id
    }

    /// Vacate a slot. Ids are never reused, so the slot stays empty.
    pub(crate) fn vacate(&mut self, id: NodeId) {
        if let Some(slot) = self.nodes.get_mut(id) {
            *slot = None;
        }
    }

    /// Verify that `children` and `parents` are mutually consistent and
    /// contain no dangling ids.
    pub fn check_symmetry(&self) -> Result<()> {
        for node in self.iter() {
            for &child in &node.children {
                let target = self
                    .node(child)
                    .ok_or(GraphError::NodeNotFound(child))?;
                if !target.parents.contains(&node.id) {
                    return Err(GraphError::SymmetryViolation {
                        parent: node.id,
                        child,
                    });
                }
            }
            for &parent in &node.parents {
                let source = self
                    .node(parent)
                    .ok_or(GraphError::NodeNotFound(parent))?;
                if !source.children.contains(&node.id) {
                    return Err(GraphError::SymmetryViolation {
                        parent,
                        child: node.id,
                    });
                }
            }
        }
        Ok(())
    }

    /// Verify the children relation is acyclic.
    pub fn check_acyclic(&self) -> Result<()> {
        let mut graph = DiGraph::<NodeId, ()>::new();
        let mut indexes = HashMap::new();

        for node in self.iter() {
            indexes.insert(node.id, graph.add_node(node.id));
        }
        for node in self.iter() {
            for &child in &node.children {
                if let (Some(&from), Some(&to)) = (indexes.get(&node.id), indexes.get(&child)) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        if is_cyclic_directed(&graph) {
            return Err(GraphError::CycleDetected);
        }
        Ok(())
    }

    /// Run all structural invariant checks.
    pub fn validate(&self) -> Result<()> {
        self.check_symmetry()?;
        self.check_acyclic()
    }
}
