use proofscope_graph::Snapshot;
use proofscope_parser::{parse, ProofFormat};
use tempfile::TempDir;

const CERTIFICATE: &str = "\
(assume a0 (p))
(assume a1 (not (p)))
(step t1 (cl) :rule resolution :premises (a0 a1))";

#[test]
fn certificate_read_from_disk_exports_a_loadable_snapshot() {
    let temp = TempDir::new().expect("tempdir");
    let cert_path = temp.path().join("proof.alethe");
    std::fs::write(&cert_path, CERTIFICATE).expect("write certificate");

    let text = std::fs::read_to_string(&cert_path).expect("read certificate");
    let format = ProofFormat::detect(&text);
    assert_eq!(format, ProofFormat::Alethe);

    let mut graph = parse(&text, format).expect("parse");
    let assumptions = graph.select_by_rule("assume");
    graph.fold(&assumptions).expect("fold");

    let out_path = temp.path().join("snapshot.json");
    let json = serde_json::to_string_pretty(&graph.snapshot()).expect("serialize");
    std::fs::write(&out_path, json).expect("write snapshot");

    let restored: Snapshot =
        serde_json::from_str(&std::fs::read_to_string(&out_path).expect("read snapshot"))
            .expect("deserialize");
    assert_eq!(restored.hidden.len(), 2);
    assert_eq!(restored.nodes.len(), 4);
    assert!(restored.nodes.iter().any(|n| n.rule == "π"));
}
