//! # Proofscope Graph
//!
//! The canonical proof DAG and the algorithms that operate over it.
//!
//! ## Features
//!
//! - **Fold boundary engine** - collapse a connected set of steps into a
//!   single pi-node, recomputing the boundary edges
//! - **Cluster engine** - group steps by shared parents or provenance phase
//! - **Dependency aggregation** - keep justification chains intact across
//!   repeated folds
//! - **Selection filters** - rule/regex/id predicates for the view layer
//!
//! ## Architecture
//!
//! ```text
//! ProofNode[] (from proofscope-parser)
//!     │
//!     ├──> Proof Graph (id table + parent/child symmetry)
//!     │      ├─ Nodes: inference steps, assumptions, pi-nodes
//!     │      └─ Edges: premise references (children) + derived parents
//!     │
//!     ├──> Fold Engine
//!     │      ├─ Boundary parents/children of a hidden set
//!     │      ├─ fold/unfold commands (lossless via hidden_nodes)
//!     │      └─ Dependency ledger merging
//!     │
//!     └──> Cluster Engine
//!            ├─ Shared-parent clustering of hidden sets
//!            ├─ Phase slicing for the simplified view
//!            └─ Theory lemma extraction
//! ```

mod cluster;
mod error;
mod fold;
mod graph;
mod lemmas;
mod select;
mod snapshot;
mod types;

pub use error::{GraphError, Result};
pub use snapshot::Snapshot;
pub use types::{
    ClusterColorMap, ClusterInfo, ClusterKind, Dependency, LetMap, NodeId, ProofGraph, ProofNode,
};
