use crate::types::{LetMap, NodeId, ProofGraph, ProofNode};
use serde::{Deserialize, Serialize};

/// Plain structured view of a session, for download/export. The node table
/// is flattened (vacated slots omitted) and visibility is summarized as the
/// list of hidden ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<ProofNode>,
    pub let_map: LetMap,
    pub hidden: Vec<NodeId>,
}

impl ProofGraph {
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.iter().cloned().collect(),
            let_map: self.let_map.clone(),
            hidden: self.iter().filter(|n| n.is_hidden).map(|n| n.id).collect(),
        }
    }
}
