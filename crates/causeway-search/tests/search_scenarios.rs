//! End-to-end searches against small known structures.

#![allow(clippy::unwrap_used)]

use causeway_core::{CancellationFlag, Error, Result};
use causeway_graph::{Edge, EdgeKind, Graph, Node, Triple};
use causeway_search::{
    ColliderStrategy, ConflictPolicy, DSeparationOracle, IndependenceOracle, IndependenceResult,
    Knowledge, MeekRules, PcSearch, SearchConfig, load_result, save_result,
};

// ============================================================================
// Fixtures
// ============================================================================

fn dag(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::from_nodes(nodes.iter().map(|&n| Node::new(n))).unwrap();
    for &(a, b) in edges {
        graph.add_named_edge(&Edge::directed(a, b)).unwrap();
    }
    graph
}

/// A --> B <-- C, B --> D
fn collider_dag() -> Graph {
    dag(&["A", "B", "C", "D"], &[("A", "B"), ("C", "B"), ("B", "D")])
}

fn directed(graph: &Graph, from: &str, to: &str) -> bool {
    let (f, t) = (graph.index_of(from).unwrap(), graph.index_of(to).unwrap());
    graph.is_directed_from_to(f, t)
}

fn adjacent(graph: &Graph, a: &str, b: &str) -> bool {
    let (a, b) = (graph.index_of(a).unwrap(), graph.index_of(b).unwrap());
    graph.is_adjacent(a, b)
}

/// Answers from a d-separation oracle, but cancels `flag` after `limit`
/// calls.
struct CancellingOracle {
    inner: DSeparationOracle,
    flag: CancellationFlag,
    limit: usize,
    calls: usize,
}

impl IndependenceOracle for CancellingOracle {
    fn variables(&self) -> Vec<Node> {
        self.inner.variables()
    }

    fn check_independence(&mut self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult> {
        self.calls += 1;
        if self.calls >= self.limit {
            self.flag.cancel();
        }
        self.inner.check_independence(x, y, z)
    }
}

/// Declares two variables and answers every test with NaN.
struct NanOracle;

impl IndependenceOracle for NanOracle {
    fn variables(&self) -> Vec<Node> {
        vec![Node::new("X"), Node::new("Y")]
    }

    fn check_independence(&mut self, _: &Node, _: &Node, _: &[Node]) -> Result<IndependenceResult> {
        Ok(IndependenceResult::independent(f64::NAN))
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn recovers_collider_with_meek_propagation() {
    for config in [SearchConfig::pc(), SearchConfig::cpc(), SearchConfig::pc_max()] {
        let strategy = config.collider_strategy;
        let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();
        let result = PcSearch::new(&mut oracle, config).run().unwrap();
        let graph = &result.graph;

        assert_eq!(graph.edge_count(), 3, "{strategy}");
        assert!(directed(graph, "A", "B"), "{strategy}");
        assert!(directed(graph, "C", "B"), "{strategy}");
        assert!(directed(graph, "B", "D"), "{strategy}");
        assert!(result.complete);
        assert_eq!(
            result.collider_triples.iter().collect::<Vec<_>>(),
            vec![&Triple::new("A", "B", "C")]
        );
        assert!(result.noncollider_triples.contains(&Triple::new("A", "B", "D")));
        assert!(result.noncollider_triples.contains(&Triple::new("C", "B", "D")));
        assert!(result.ambiguous_triples.is_empty());
    }
}

#[test]
fn chain_stays_undirected() {
    let mut oracle = DSeparationOracle::new(dag(&["X", "Y", "Z"], &[("X", "Y"), ("Y", "Z")])).unwrap();
    let result = PcSearch::new(&mut oracle, SearchConfig::pc()).run().unwrap();

    assert_eq!(result.graph.edge_count(), 2);
    assert!(result.graph.edges().iter().all(|e| e.kind() == EdgeKind::Undirected));
    assert_eq!(result.sepsets.get("X", "Z"), Some(&["Y".to_string()][..]));
    assert!(result.collider_triples.is_empty());
}

#[test]
fn repeated_runs_are_identical() {
    let truth = dag(
        &["A", "B", "C", "D", "E"],
        &[("A", "C"), ("B", "C"), ("C", "D"), ("B", "E"), ("D", "E")],
    );
    let run = || {
        let mut oracle = DSeparationOracle::new(truth.clone()).unwrap();
        PcSearch::new(&mut oracle, SearchConfig::pc_max()).run().unwrap()
    };
    let first = run();
    let second = run();

    assert_eq!(first.graph.edges(), second.graph.edges());
    assert_eq!(first.sepsets, second.sepsets);
    assert_eq!(first.collider_triples, second.collider_triples);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn meek_closure_is_idempotent_on_results() {
    let truth = dag(
        &["A", "B", "C", "D", "E"],
        &[("A", "C"), ("B", "C"), ("C", "D"), ("D", "E"), ("B", "E")],
    );
    let mut oracle = DSeparationOracle::new(truth).unwrap();
    let result = PcSearch::new(&mut oracle, SearchConfig::pc()).run().unwrap();

    let knowledge = Knowledge::empty();
    let mut again = result.graph.clone();
    let outcome = MeekRules::new(&knowledge).orient_implied(&mut again).unwrap();
    assert_eq!(outcome.oriented, 0);
    assert!(outcome.converged);
    assert_eq!(again.edges(), result.graph.edges());
}

// ============================================================================
// Knowledge
// ============================================================================

#[test]
fn forbidden_adjacency_is_absent() {
    let knowledge = Knowledge::builder().forbid_adjacency("B", "D").build().unwrap();
    let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();
    let result = PcSearch::new(&mut oracle, SearchConfig::pc())
        .with_knowledge(knowledge)
        .run()
        .unwrap();

    assert!(!adjacent(&result.graph, "B", "D"));
    assert_eq!(result.stats.removed_by_knowledge, 1);
}

#[test]
fn required_orientation_is_present() {
    let knowledge = Knowledge::builder().require("D", "B").build().unwrap();
    let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();
    let result = PcSearch::new(&mut oracle, SearchConfig::pc())
        .with_knowledge(knowledge)
        .run()
        .unwrap();

    assert!(directed(&result.graph, "D", "B"));
    assert!(directed(&result.graph, "A", "B"));
    assert!(directed(&result.graph, "C", "B"));
    assert!(result.stats.required_orientations >= 1);
}

#[test]
fn tiers_block_collider_orientation() {
    // X --> Y <-- Z, but Y sits in an earlier tier than X and Z.
    let knowledge = Knowledge::builder()
        .add_tier(["Y"])
        .add_tier(["X", "Z"])
        .build()
        .unwrap();
    let mut oracle = DSeparationOracle::new(dag(&["X", "Y", "Z"], &[("X", "Y"), ("Z", "Y")])).unwrap();
    let result = PcSearch::new(&mut oracle, SearchConfig::pc())
        .with_knowledge(knowledge)
        .run()
        .unwrap();

    assert!(result.collider_triples.contains(&Triple::new("X", "Y", "Z")));
    assert!(!directed(&result.graph, "X", "Y"));
    assert!(!directed(&result.graph, "Z", "Y"));
    assert_eq!(result.stats.collider_orientations, 0);
}

#[test]
fn contradictory_knowledge_rejected_at_build() {
    let err = Knowledge::builder()
        .require("A", "B")
        .forbid("A", "B")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Knowledge(_)));

    let err = Knowledge::builder()
        .require("A", "B")
        .require("B", "A")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Knowledge(_)));
}

// ============================================================================
// Failure and interruption
// ============================================================================

#[test]
fn nan_statistic_aborts_search() {
    let mut oracle = NanOracle;
    let err = PcSearch::new(&mut oracle, SearchConfig::pc()).run().unwrap_err();
    assert!(
        matches!(&err, Error::Oracle { message, .. } if message.contains("NaN")),
        "unexpected error: {err}"
    );
}

#[test]
fn interrupted_search_returns_incomplete_result() {
    let flag = CancellationFlag::new();
    let mut oracle = CancellingOracle {
        inner: DSeparationOracle::new(collider_dag()).unwrap(),
        flag: flag.clone(),
        limit: 2,
        calls: 0,
    };
    let result = PcSearch::new(&mut oracle, SearchConfig::pc())
        .with_cancellation(flag)
        .run()
        .unwrap();

    assert!(!result.complete);
    assert_eq!(result.stats.oracle_calls, 2);
    assert!(result.collider_triples.is_empty());
    assert!(result.graph.edges().iter().all(|e| e.kind() == EdgeKind::Undirected));
    assert!(result.graph.edge_count() >= 3);
}

#[test]
fn initial_graph_outside_domain_is_config_error() {
    let initial = dag(&["A", "Q"], &[("A", "Q")]);
    let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();

    let err = PcSearch::new(&mut oracle, SearchConfig::pc())
        .with_initial_graph(initial)
        .run()
        .unwrap_err();
    assert!(err.is_config());
}

// ============================================================================
// Conflict policies and persistence
// ============================================================================

#[test]
fn policies_agree_when_colliders_share_no_edge() {
    // A --> B <-- C --> D <-- E: the colliders meet at C only.
    let truth = dag(
        &["A", "B", "C", "D", "E"],
        &[("A", "B"), ("C", "B"), ("C", "D"), ("E", "D")],
    );
    for policy in [
        ConflictPolicy::PrioritizeExisting,
        ConflictPolicy::OrientBidirected,
        ConflictPolicy::OverwriteExisting,
    ] {
        let config = SearchConfig { conflict_policy: policy, ..SearchConfig::pc() };
        let mut oracle = DSeparationOracle::new(truth.clone()).unwrap();
        let result = PcSearch::new(&mut oracle, config).run().unwrap();
        assert_eq!(result.collider_triples.len(), 2, "{policy}");
        assert!(directed(&result.graph, "C", "B"), "{policy}");
        assert!(directed(&result.graph, "C", "D"), "{policy}");
    }
}

#[test]
fn result_survives_json_round_trip() {
    let config = SearchConfig::cpc();
    let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();
    let result = PcSearch::new(&mut oracle, config.clone()).run().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.json");
    save_result(&result, Some(&config), &path).unwrap();

    let stored = load_result(&path).unwrap();
    assert_eq!(stored.config.as_ref().map(|c| c.collider_strategy), Some(ColliderStrategy::Conservative));
    let restored = stored.into_result().unwrap();
    assert_eq!(restored.graph.edges(), result.graph.edges());
    assert_eq!(restored.sepsets, result.sepsets);
    assert_eq!(restored.ambiguous_triples, result.ambiguous_triples);
}
