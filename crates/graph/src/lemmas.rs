use crate::types::{ClusterInfo, ClusterKind, ProofGraph};

impl ProofGraph {
    /// Conclusions of the theory lemmas used by the proof.
    ///
    /// With cluster metadata (DOT input) the list is the root conclusion
    /// followed by the first member of every theory-lemma cluster. The
    /// Alethe format carries no cluster metadata, so the fallback
    /// approximates by rule name: every `SCOPE` step is taken as a lemma.
    #[must_use]
    pub fn extract_theory_lemmas(
        &self,
        clusters: &[ClusterInfo],
        have_clusters: bool,
    ) -> Vec<String> {
        if !have_clusters {
            return self
                .iter()
                .filter(|n| n.rule == "SCOPE")
                .map(|n| n.conclusion.clone())
                .collect();
        }

        let mut lemmas = Vec::new();
        if let Some(root) = self.root() {
            lemmas.push(root.conclusion.clone());
        }
        for cluster in clusters.iter().filter(|c| c.kind == ClusterKind::Tl) {
            if let Some(node) = cluster.nodes.first().and_then(|&id| self.node(id)) {
                lemmas.push(node.conclusion.clone());
            }
        }
        lemmas
    }
}
