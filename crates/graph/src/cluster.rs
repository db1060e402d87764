use crate::types::{ClusterInfo, ClusterKind, NodeId, ProofGraph};
use std::collections::{HashMap, HashSet};

/// Safety net against non-convergence of the merge fixpoint on malformed
/// inputs. Every pass performs at most one merge, and each merge removes a
/// cluster, so any sane input converges far below this.
const MAX_MERGE_PASSES: usize = 10_000;

impl ProofGraph {
    /// Group `hidden` nodes into clusters of nodes connected through shared
    /// parents.
    ///
    /// Pass one groups pairwise by intersecting parent sets, consuming each
    /// node on its first match; nodes with no parents are left out. Pass two
    /// repeatedly merges clusters transitively linked through the first
    /// member's parents until a full pass makes no change. Singleton
    /// clusters are not reported.
    #[must_use]
    pub fn find_nodes_clusters(&self, hidden: &[NodeId]) -> Vec<Vec<NodeId>> {
        let parent_sets: Vec<Vec<NodeId>> = hidden
            .iter()
            .map(|&h| self.node(h).map(|n| n.parents.clone()).unwrap_or_default())
            .collect();

        let mut used = vec![false; hidden.len()];
        let mut clusters: Vec<Vec<NodeId>> = Vec::new();

        for seed in 0..hidden.len() {
            if used[seed] || parent_sets[seed].is_empty() {
                continue;
            }
            let mut cluster = Vec::new();
            for candidate in 0..hidden.len() {
                if used[candidate] || parent_sets[candidate].is_empty() {
                    continue;
                }
                if parent_sets[seed]
                    .iter()
                    .any(|p| parent_sets[candidate].contains(p))
                {
                    cluster.push(hidden[candidate]);
                    used[candidate] = true;
                }
            }
            clusters.push(cluster);
        }

        let mut passes = 0;
        loop {
            passes += 1;
            if passes > MAX_MERGE_PASSES {
                log::warn!("cluster merge did not converge after {MAX_MERGE_PASSES} passes");
                break;
            }
            if !self.merge_one_linked_pair(&mut clusters) {
                break;
            }
        }

        clusters.into_iter().filter(|c| c.len() > 1).collect()
    }

    /// One scan of the cluster list: merge the first cluster whose
    /// first-member parent set intersects another cluster, into that
    /// cluster. Returns whether a merge happened.
    fn merge_one_linked_pair(&self, clusters: &mut Vec<Vec<NodeId>>) -> bool {
        for current in 0..clusters.len() {
            let Some(&first) = clusters[current].first() else {
                continue;
            };
            let Some(parent_set) = self.node(first).map(|n| &n.parents) else {
                continue;
            };
            for target in 0..clusters.len() {
                if target == current {
                    continue;
                }
                if clusters[target].iter().any(|m| parent_set.contains(m)) {
                    let absorbed = clusters.remove(current);
                    let target = if target > current { target - 1 } else { target };
                    clusters[target].extend(absorbed);
                    return true;
                }
            }
        }
        false
    }

    /// Partition the whole DAG into provenance-phase clusters with a single
    /// depth-first walk from the root.
    ///
    /// An unassigned node joins the cluster of its first already-assigned
    /// parent with the same `cluster_type`; otherwise it opens a new cluster
    /// and immediately absorbs the same-type siblings hanging off its first
    /// parent. Every reachable node ends up in exactly one cluster.
    #[must_use]
    pub fn slice_nodes_cluster(&self) -> Vec<ClusterInfo> {
        let mut assigned: HashMap<NodeId, usize> = HashMap::new();
        let mut clusters: Vec<Vec<NodeId>> = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();

        if self.root().is_some() {
            self.slice_walk(0, &mut assigned, &mut clusters, &mut visited);
        }

        clusters
            .into_iter()
            .map(|nodes| ClusterInfo {
                kind: nodes
                    .first()
                    .and_then(|&id| self.node(id))
                    .map_or(ClusterKind::None, |n| n.cluster_type),
                nodes,
            })
            .collect()
    }

    fn slice_walk(
        &self,
        id: NodeId,
        assigned: &mut HashMap<NodeId, usize>,
        clusters: &mut Vec<Vec<NodeId>>,
        visited: &mut HashSet<NodeId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        let Some(node) = self.node(id) else { return };

        if !assigned.contains_key(&id) {
            let mut target = None;
            for &parent in &node.parents {
                let same_type = self
                    .node(parent)
                    .is_some_and(|p| p.cluster_type == node.cluster_type);
                if !same_type {
                    continue;
                }
                if let Some(&slot) = assigned.get(&parent) {
                    target = Some(slot);
                    break;
                }
            }

            match target {
                Some(slot) => {
                    clusters[slot].push(id);
                    assigned.insert(id, slot);
                }
                None => {
                    let slot = clusters.len();
                    clusters.push(vec![id]);
                    assigned.insert(id, slot);

                    // Siblings under the first parent with the same phase
                    // belong together.
                    if let Some(siblings) = node
                        .parents
                        .first()
                        .and_then(|&p| self.node(p))
                        .map(|p| p.children.clone())
                    {
                        for sibling in siblings {
                            if sibling == id || assigned.contains_key(&sibling) {
                                continue;
                            }
                            let same_type = self
                                .node(sibling)
                                .is_some_and(|s| s.cluster_type == node.cluster_type);
                            if same_type {
                                clusters[slot].push(sibling);
                                assigned.insert(sibling, slot);
                            }
                        }
                    }
                }
            }
        }

        for child in node.children.clone() {
            self.slice_walk(child, assigned, clusters, visited);
        }
    }
}
