use crate::scan::{enclosed_text, is_assume_line, is_step_line, join_args};
use proofscope_graph::{ClusterColorMap, LetMap, NodeId, ProofNode};
use std::collections::{HashMap, HashSet};

const PREMISES_MARKER: &str = ":premises";
const ARGS_MARKER: &str = ":args";
const DISCHARGE_MARKER: &str = ":discharge";
const RULE_MARKER: &str = ":rule";

/// Per-line record before premise tokens are resolved against the id table.
struct RawStep {
    conclusion: String,
    rule: String,
    args: String,
    premise_tokens: Vec<String>,
    subproof_child: Option<NodeId>,
}

/// Convert an Alethe certificate into the proof node table.
///
/// Lines are processed in reverse so the final conclusion lands at id 0,
/// matching the DOT format's root convention. Resolution is two-pass: the
/// first pass collects raw records and fills the id table, the second
/// resolves every premise token against the completed table (tokens that
/// never resolve are dropped). The format carries no let-binding or cluster
/// metadata, so those maps come back empty.
#[must_use]
pub fn process_alethe(text: &str) -> (Vec<ProofNode>, LetMap, ClusterColorMap) {
    let lines = text
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains("anchor"));

    let mut id_table: HashMap<String, NodeId> = HashMap::new();
    let mut raw: Vec<RawStep> = Vec::new();

    for line in lines {
        let index = raw.len();
        if is_step_line(line) {
            let alethe_id = step_identifier(line);
            id_table.insert(alethe_id.clone(), index);

            let clause = enclosed_text(line, &alethe_id);
            let conclusion = clause.strip_prefix("cl").unwrap_or(clause).trim().to_string();
            let rule = step_rule(line);
            let premise_tokens = enclosed_text(line, PREMISES_MARKER)
                .split_whitespace()
                .map(str::to_string)
                .collect();
            let args = enclosed_text(line, ARGS_MARKER);
            let discharge = enclosed_text(line, DISCHARGE_MARKER);

            // A subproof body is emitted as the line right after its step,
            // which in reversed order is the next slot.
            let subproof_child = (rule == "subproof").then_some(index + 1);

            raw.push(RawStep {
                conclusion,
                rule,
                args: join_args(args, discharge),
                premise_tokens,
                subproof_child,
            });
        } else if is_assume_line(line) {
            let (alethe_id, term) = assume_parts(line);
            id_table.insert(alethe_id, index);
            raw.push(RawStep {
                conclusion: term,
                rule: "assume".to_string(),
                args: String::new(),
                premise_tokens: Vec::new(),
                subproof_child: None,
            });
        } else {
            log::debug!("skipping unrecognized certificate line: {line}");
        }
    }

    let total = raw.len();
    let mut nodes: Vec<ProofNode> = raw
        .into_iter()
        .enumerate()
        .map(|(id, step)| {
            let mut children: Vec<NodeId> = step
                .premise_tokens
                .iter()
                .filter_map(|token| {
                    let resolved = id_table.get(token).copied();
                    if resolved.is_none() {
                        log::debug!("dropping unresolvable premise token {token:?}");
                    }
                    resolved
                })
                .collect();
            if let Some(child) = step.subproof_child.filter(|&c| c < total) {
                children.push(child);
            }
            ProofNode {
                conclusion: step.conclusion,
                rule: step.rule,
                args: step.args,
                children,
                ..ProofNode::placeholder(id)
            }
        })
        .collect();

    resolve_parents(&mut nodes);
    let counts: Vec<usize> = (0..nodes.len())
        .map(|id| count_reachable(&nodes, id))
        .collect();
    for (node, count) in nodes.iter_mut().zip(counts) {
        node.descendants = count;
    }

    log::info!("parsed Alethe certificate: {} nodes", nodes.len());
    (nodes, LetMap::new(), ClusterColorMap::new())
}

/// The local identifier of a step line: the token between `step` and the
/// `(cl` clause form.
fn step_identifier(line: &str) -> String {
    let Some(step_at) = line.find("step") else {
        return String::new();
    };
    let rest = &line[step_at + 4..];
    let Some(clause_at) = rest.find("(cl") else {
        return String::new();
    };
    rest[..clause_at].trim().to_string()
}

/// The rule name: everything after `:rule` up to the first of
/// `:discharge`/`:premises`, or the end of the line.
fn step_rule(line: &str) -> String {
    let Some(rule_at) = line.find(RULE_MARKER) else {
        return String::new();
    };
    let rest = &line[rule_at + RULE_MARKER.len()..];
    let end = [DISCHARGE_MARKER, PREMISES_MARKER]
        .iter()
        .filter_map(|marker| rest.find(marker))
        .min()
        .unwrap_or(rest.len());
    rest[..end].replace(')', "").trim().to_string()
}

/// Identifier and term of an `(assume <id> <term>)` line.
fn assume_parts(line: &str) -> (String, String) {
    let body = line.strip_prefix("(assume").unwrap_or(line);
    let body = body.strip_suffix(')').unwrap_or(body).trim();
    match body.split_once(char::is_whitespace) {
        Some((id, term)) => (id.to_string(), term.trim().to_string()),
        None => (body.to_string(), String::new()),
    }
}

/// Derive every node's `parents` by inverse-scanning all `children`.
fn resolve_parents(nodes: &mut [ProofNode]) {
    let edges: Vec<(NodeId, NodeId)> = nodes
        .iter()
        .flat_map(|node| node.children.iter().map(move |&child| (node.id, child)))
        .collect();
    for (parent, child) in edges {
        if let Some(node) = nodes.get_mut(child) {
            node.parents.push(parent);
        }
    }
}

/// Count of distinct nodes transitively reachable through `children`.
fn count_reachable(nodes: &[ProofNode], start: NodeId) -> usize {
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<NodeId> = nodes[start].children.clone();
    while let Some(id) = stack.pop() {
        if seen.insert(id) {
            if let Some(node) = nodes.get(id) {
                stack.extend(node.children.iter().copied());
            }
        }
    }
    seen.len()
}
