//! # Proofscope Parser
//!
//! Converts proof certificates into the canonical node graph.
//!
//! Two textual formats are supported:
//!
//! - **Alethe** - line-oriented `(step ...)`/`(assume ...)` commands; the
//!   graph is rebuilt from premise references, carrying no cluster or
//!   let-binding metadata
//! - **DOT** - a Graphviz digraph with record labels, JSON comment
//!   attributes (sub-proof sizes, the let map) and subgraph cluster blocks
//!
//! ## Architecture
//!
//! ```text
//! certificate text
//!     │
//!     ├──> Scanner (line classes, balanced parens, escapes)
//!     │
//!     ├──> Alethe parser ── two-pass premise resolution
//!     │      └─ (nodes, empty let map, empty colors)
//!     │
//!     └──> DOT parser ── placeholder-then-fill slot table
//!            └─ (nodes, let map, cluster colors)
//! ```
//!
//! Both feed [`ProofGraph`], the structure the fold/cluster engines in
//! `proofscope-graph` operate over.

mod alethe;
mod dot;
mod error;
mod scan;

pub use alethe::process_alethe;
pub use dot::process_dot;
pub use error::{ParseError, Result};
pub use scan::{enclosed_text, is_assume_line, is_step_line, join_args, unescape};

use proofscope_graph::ProofGraph;

/// The two certificate formats the parsers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofFormat {
    Alethe,
    Dot,
}

impl ProofFormat {
    /// Guess the format from the text itself: a `digraph` body means DOT,
    /// anything else is treated as Alethe.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        if text.trim_start().starts_with("digraph") {
            Self::Dot
        } else {
            Self::Alethe
        }
    }
}

/// Parse a certificate into a ready-to-use proof graph.
pub fn parse(text: &str, format: ProofFormat) -> Result<ProofGraph> {
    let (nodes, let_map, colors) = match format {
        ProofFormat::Alethe => process_alethe(text),
        ProofFormat::Dot => process_dot(text)?,
    };
    Ok(ProofGraph::new(nodes, let_map, colors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_formats() {
        assert_eq!(ProofFormat::detect("digraph proof { }"), ProofFormat::Dot);
        assert_eq!(
            ProofFormat::detect("(assume a0 true)"),
            ProofFormat::Alethe
        );
    }

    #[test]
    fn parse_routes_to_the_right_processor() {
        let graph = parse("(assume a0 (p))\n(step t1 (cl) :rule R :premises (a0))", ProofFormat::Alethe)
            .expect("alethe");
        assert_eq!(graph.len(), 2);

        let graph = parse("digraph { 1 -> 0; }", ProofFormat::Dot).expect("dot");
        assert_eq!(graph.len(), 2);
    }
}
