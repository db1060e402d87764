use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Parent/child symmetry violated between {parent} and {child}")]
    SymmetryViolation { parent: NodeId, child: NodeId },

    #[error("Proof graph contains a cycle")]
    CycleDetected,

    #[error("{0}")]
    Other(String),
}
