use crate::error::{ParseError, Result};
use crate::scan::unescape;
use proofscope_graph::{ClusterColorMap, ClusterKind, LetMap, NodeId, ProofNode};

/// A node-table slot during the streaming parse. Ids referenced before
/// their defining statement get a `Pending` placeholder that accumulates
/// edges and cluster tags; the defining statement later fills the fields in
/// place and marks the slot `Resolved`. The node value itself is never
/// replaced, so early edges survive.
enum Slot {
    Pending(ProofNode),
    Resolved(ProofNode),
}

impl Slot {
    fn node_mut(&mut self) -> &mut ProofNode {
        match self {
            Self::Pending(node) | Self::Resolved(node) => node,
        }
    }

    fn resolve(&mut self) {
        if let Self::Pending(node) = self {
            let node = std::mem::replace(node, ProofNode::placeholder(0));
            *self = Self::Resolved(node);
        }
    }

    fn into_node(self) -> ProofNode {
        match self {
            Self::Pending(node) | Self::Resolved(node) => node,
        }
    }
}

/// Convert a DOT graph description into the proof node table, the
/// let-binding map from the graph-level comment, and the cluster color
/// table from the subgraph blocks.
pub fn process_dot(text: &str) -> Result<(Vec<ProofNode>, LetMap, ClusterColorMap)> {
    let open = text.find('{').ok_or(ParseError::MissingGraphBody)?;
    let close = text.rfind('}').ok_or(ParseError::MissingGraphBody)?;
    if close <= open {
        return Err(ParseError::MissingGraphBody);
    }

    let let_map = parse_let_map(text);
    let mut colors = ClusterColorMap::new();
    let mut slots: Vec<Slot> = vec![Slot::Pending(ProofNode::placeholder(0))];

    let body: String = text[open + 1..close]
        .chars()
        .filter(|&c| c != '\n' && c != '\t')
        .collect();

    for statement in body.split(';') {
        if statement.contains("subgraph") {
            parse_subgraph(statement, &mut slots, &mut colors);
        } else if statement.contains("label") {
            parse_node_statement(statement, &mut slots);
        } else if statement.contains("->") {
            parse_edge(statement, &mut slots);
        }
    }

    let nodes: Vec<ProofNode> = slots.into_iter().map(Slot::into_node).collect();
    log::info!(
        "parsed DOT proof: {} nodes, {} clusters, {} let bindings",
        nodes.len(),
        colors.len(),
        let_map.len()
    );
    Ok((nodes, let_map, colors))
}

/// Offset of the first quote not preceded by a backslash.
fn find_unescaped_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut at = 0;
    while at < bytes.len() {
        match bytes[at] {
            b'\\' => at += 2,
            b'"' => return Some(at),
            _ => at += 1,
        }
    }
    None
}

/// Value of a quoted `key="value"` attribute, plus the offset just past its
/// closing quote.
fn attr_value<'a>(s: &'a str, key: &str) -> Option<(&'a str, usize)> {
    let start = s.find(key)? + key.len();
    let end = find_unescaped_quote(&s[start..])?;
    Some((&s[start..start + end], start + end + 1))
}

/// The offset of the first `|` not preceded by a backslash, splitting the
/// record label into conclusion and rule fields.
fn split_record_label(label: &str) -> (&str, &str) {
    let bytes = label.as_bytes();
    let mut at = 0;
    while at < bytes.len() {
        match bytes[at] {
            b'\\' => at += 2,
            b'|' => return (&label[..at], &label[at + 1..]),
            _ => at += 1,
        }
    }
    (label, "")
}

/// Grow the slot table with placeholders up to and including `id`.
fn ensure_slot(slots: &mut Vec<Slot>, id: NodeId) {
    while slots.len() <= id {
        slots.push(Slot::Pending(ProofNode::placeholder(slots.len())));
    }
}

/// The graph-level `comment="{...}"` attribute, double-unescaped and parsed
/// as JSON, supplies the let-binding table.
fn parse_let_map(text: &str) -> LetMap {
    let Some(comment_at) = text.find("comment=") else {
        return LetMap::new();
    };
    let after = &text[comment_at + "comment=".len()..];
    let end = after.find(';').unwrap_or(after.len());
    let raw = after[..end].trim().trim_matches('"');
    let payload = unescape(&unescape(raw));

    match serde_json::from_str::<serde_json::Value>(&payload) {
        Ok(value) => value
            .get("letMap")
            .and_then(serde_json::Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(key, value)| {
                        let term = value
                            .as_str()
                            .map_or_else(|| value.to_string(), str::to_string);
                        (key.clone(), term)
                    })
                    .collect()
            })
            .unwrap_or_default(),
        Err(err) => {
            log::debug!("graph comment is not a JSON let map: {err}");
            LetMap::new()
        }
    }
}

/// A cluster boundary: label names the phase, bgcolor its display color,
/// and the trailing id list tags every member node.
fn parse_subgraph(statement: &str, slots: &mut Vec<Slot>, colors: &mut ClusterColorMap) {
    let Some((label, _)) = attr_value(statement, "label=\"") else {
        return;
    };
    let Some((color, color_end)) = attr_value(statement, "bgcolor=\"") else {
        return;
    };
    let kind = ClusterKind::from_label(label);

    for token in statement[color_end..].split_whitespace() {
        let token = token.trim_matches(|c| c == '{' || c == '}');
        let Ok(id) = token.parse::<NodeId>() else {
            continue;
        };
        ensure_slot(slots, id);
        slots[id].node_mut().cluster_type = kind;
    }
    colors.insert(kind, color.to_string());
}

/// A node statement: `id [label="conclusion|rule[ :args args]",
/// comment="{'subProofQty': n}"]`.
fn parse_node_statement(statement: &str, slots: &mut Vec<Slot>) {
    let Some(bracket) = statement.find('[') else {
        return;
    };
    let Ok(id) = statement[..bracket].trim().parse::<NodeId>() else {
        log::debug!("skipping node statement with non-numeric id: {statement}");
        return;
    };

    let attributes = &statement[bracket + 1..statement.rfind(']').unwrap_or(statement.len())];
    let label = attr_value(attributes, "label=\"").map_or("", |(value, _)| value);
    // Record-shape labels wrap the fields in one outer brace pair.
    let label = label.strip_prefix('{').unwrap_or(label);
    let label = label.strip_suffix('}').unwrap_or(label);
    let (conclusion, rest) = split_record_label(label);
    let (rule, args) = match rest.find(" :args ") {
        Some(at) => (&rest[..at], &rest[at + " :args ".len()..]),
        None => (rest, ""),
    };

    ensure_slot(slots, id);
    let slot = &mut slots[id];
    {
        let node = slot.node_mut();
        node.conclusion = unescape(conclusion);
        node.rule = unescape(rule);
        node.args = unescape(args);
        node.descendants = sub_proof_size(attributes);
    }
    slot.resolve();
}

/// The precomputed sub-proof size from the node's JSON comment attribute.
fn sub_proof_size(attributes: &str) -> usize {
    let Some((raw, _)) = attr_value(attributes, "comment=\"") else {
        return 0;
    };
    let normalized = unescape(raw).replace('\'', "\"");
    match serde_json::from_str::<serde_json::Value>(&normalized) {
        Ok(value) => value
            .get("subProofQty")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0) as usize,
        Err(err) => {
            log::debug!("node comment is not valid JSON: {err}");
            0
        }
    }
}

/// An edge statement `child -> parent`. Both endpoints are created lazily;
/// a premise may justify several steps, so parents append.
fn parse_edge(statement: &str, slots: &mut Vec<Slot>) {
    let Some((child, parent)) = statement.split_once("->") else {
        return;
    };
    let (Ok(child), Ok(parent)) = (
        child.trim().parse::<NodeId>(),
        parent.trim().parse::<NodeId>(),
    ) else {
        log::debug!("skipping edge statement with non-numeric endpoint: {statement}");
        return;
    };

    ensure_slot(slots, child.max(parent));
    slots[parent].node_mut().children.push(child);
    slots[child].node_mut().parents.push(parent);
}
