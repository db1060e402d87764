use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense index into the proof node table. Assigned at parse time in file
/// order and never reused or renumbered afterwards.
pub type NodeId = usize;

/// Let-binding abbreviations extracted from the certificate metadata,
/// mapping a bound symbol to its term text. Immutable after parse.
pub type LetMap = HashMap<String, String>;

/// Display color per cluster kind, recorded by the DOT parser.
/// Pass-through metadata, not consulted by the graph algorithms.
pub type ClusterColorMap = HashMap<ClusterKind, String>;

/// Provenance phase of a proof step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ClusterKind {
    /// No phase recorded (always the case for the Alethe format)
    #[default]
    None,

    /// SAT solving
    Sat,

    /// CNF conversion
    Cnf,

    /// Theory lemma
    Tl,

    /// Preprocessing
    Pp,

    /// Input
    In,
}

impl ClusterKind {
    /// Map a subgraph label to a cluster kind. Unknown labels map to `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "SAT" => Self::Sat,
            "CNF" => Self::Cnf,
            "TL" => Self::Tl,
            "PP" => Self::Pp,
            "IN" => Self::In,
            _ => Self::None,
        }
    }
}

/// Records that a node's omitted reasoning was folded into a pi-node,
/// so justification chains survive repeated fold operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// The node depending on folded-away reasoning
    pub pi_id: NodeId,

    /// The folded nodes it depended on
    pub deps_id: Vec<NodeId>,
}

/// One inference step or assumption in the proof DAG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    /// Dense table index
    pub id: NodeId,

    /// Formula text produced by the step (opaque, not parsed semantically)
    pub conclusion: String,

    /// Inference rule name, or `"assume"` for leaves
    pub rule: String,

    /// Rule arguments joined with discharge information (opaque)
    pub args: String,

    /// Premises this step depends on, pointing toward the assumptions
    pub children: Vec<NodeId>,

    /// Steps citing this node as a premise; inverse of `children`, derived
    pub parents: Vec<NodeId>,

    /// Distinct nodes transitively reachable through `children`
    /// (the DOT format reads a precomputed sub-proof size instead)
    pub descendants: usize,

    /// True once the node is folded away under a pi-node
    pub is_hidden: bool,

    /// The collapsed originals; present only on a pi-node
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hidden_nodes: Option<Vec<ProofNode>>,

    /// Which pi-node(s) this node's omitted reasoning was folded into
    pub dependencies: Vec<Dependency>,

    /// Provenance phase tag, set only by the DOT parser
    pub cluster_type: ClusterKind,
}

impl ProofNode {
    /// Minimal node standing in for an id referenced before its defining
    /// statement. Later definitions fill the fields in place.
    #[must_use]
    pub fn placeholder(id: NodeId) -> Self {
        Self {
            id,
            conclusion: String::new(),
            rule: String::new(),
            args: String::new(),
            children: Vec::new(),
            parents: Vec::new(),
            descendants: 0,
            is_hidden: false,
            hidden_nodes: None,
            dependencies: Vec::new(),
            cluster_type: ClusterKind::None,
        }
    }

    /// Whether this node is a synthesized pi-node.
    #[must_use]
    pub fn is_pi(&self) -> bool {
        self.hidden_nodes.is_some()
    }
}

/// One phase cluster of the simplified view: a named group of node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub kind: ClusterKind,
    pub nodes: Vec<NodeId>,
}

/// The canonical proof DAG all algorithms operate over.
///
/// Owns id-based lookup and the parent/child symmetry invariant. Vacant
/// slots only ever come from removing an unfolded pi-node; real proof nodes
/// are never deleted, only marked hidden.
#[derive(Debug, Clone, Default)]
pub struct ProofGraph {
    pub(crate) nodes: Vec<Option<ProofNode>>,

    /// Let-binding table from the certificate's graph-level comment
    pub let_map: LetMap,

    /// Cluster background colors from the DOT subgraph blocks
    pub cluster_colors: ClusterColorMap,
}
