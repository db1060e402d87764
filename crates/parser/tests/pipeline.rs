use proofscope_graph::ClusterKind;
use proofscope_parser::{parse, ProofFormat};

const ALETHE: &str = "\
(assume a0 (p))
(assume a1 (=> p q))
(anchor :step t2)
(step t1 (cl q) :rule implies :premises (a0 a1))
(step t2 (cl) :rule resolution :premises (t1 a0))";

const DOT: &str = r##"digraph proof {
	comment="{\"letMap\":{\"@p_0\":\"(=> p q)\"}}";
	0 [label="{false|resolution}", comment="{'subProofQty':3}"];
	1 [label="{q|implies}", comment="{'subProofQty':2}"];
	2 [label="{(=> p q)|assume}", comment="{'subProofQty':1}"];
	3 [label="{(p)|assume}", comment="{'subProofQty':1}"];
	1 -> 0;
	3 -> 0;
	3 -> 1;
	2 -> 1;
	subgraph cluster_in { label="IN" bgcolor="#EEEEEE" 2 3 };
	subgraph cluster_tl { label="TL" bgcolor="#CCFFCC" 1 };
}"##;

#[test]
fn alethe_certificate_survives_the_whole_pipeline() {
    let mut graph = parse(ALETHE, ProofFormat::Alethe).expect("parse");
    assert_eq!(graph.len(), 4);
    graph.validate().expect("invariants after parse");

    // Root is the reversed final step; its premises reach every other node.
    let root = graph.root().expect("root");
    assert_eq!(root.rule, "resolution");
    assert_eq!(root.descendants, 3);

    let visible_before: Vec<_> = graph.visible().map(|n| n.id).collect();
    let assumptions = graph.select_by_rule("assume");
    assert_eq!(assumptions.len(), 2);

    let pi = graph.fold(&assumptions).expect("fold assumptions");
    graph.validate().expect("invariants after fold");
    assert!(graph.node(pi).expect("pi").is_pi());
    assert_eq!(graph.visible().count(), 3);

    assert!(graph.unfold(pi));
    graph.validate().expect("invariants after unfold");
    let visible_after: Vec<_> = graph.visible().map(|n| n.id).collect();
    assert_eq!(visible_before, visible_after);
}

#[test]
fn dot_certificate_carries_clusters_and_let_map() {
    let graph = parse(DOT, ProofFormat::Dot).expect("parse");
    graph.validate().expect("invariants after parse");

    assert_eq!(
        graph.let_map.get("@p_0").map(String::as_str),
        Some("(=> p q)")
    );
    assert_eq!(
        graph.cluster_colors.get(&ClusterKind::In).map(String::as_str),
        Some("#EEEEEE")
    );

    let clusters = graph.slice_nodes_cluster();
    let lemmas = graph.extract_theory_lemmas(&clusters, true);
    assert_eq!(lemmas[0], "false");
    assert!(lemmas.contains(&"q".to_string()));

    let snapshot = graph.snapshot();
    assert_eq!(snapshot.nodes.len(), 4);
    assert!(snapshot.hidden.is_empty());
}

#[test]
fn formats_agree_on_the_node_graph_shape() {
    let alethe = parse(ALETHE, ProofFormat::Alethe).expect("alethe");
    let dot = parse(DOT, ProofFormat::Dot).expect("dot");

    assert_eq!(alethe.len(), dot.len());
    for node in alethe.iter() {
        let twin = dot.node(node.id).expect("same id space");
        let mut expected = twin.children.clone();
        expected.sort_unstable();
        let mut actual = node.children.clone();
        actual.sort_unstable();
        assert_eq!(actual, expected, "children of node {}", node.id);
    }
}
