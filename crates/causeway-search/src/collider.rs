//! Unshielded-triple classification and collider orientation.
//!
//! Every unshielded triple `x - y - z` of the skeleton is classified as a
//! collider (`x --> y <-- z`), a noncollider or ambiguous. The strategy is
//! chosen once per search:
//!
//! - [`ColliderStrategy::Sepsets`] reads the separating set recorded by the
//!   adjacency search.
//! - [`ColliderStrategy::Conservative`] re-tests every subset of the
//!   adjacents and only commits when all minimal separating sets agree.
//! - [`ColliderStrategy::MaxP`] commits to the separating set with the
//!   highest statistic and orients colliders strongest first.

use crate::conflict::{ConflictPolicy, EndpointPair};
use crate::knowledge::Knowledge;
use crate::oracle::OracleSession;
use crate::sepset::{SepsetMap, SepsetsMinimal};
use crate::subsets::subsets_of_size;
use causeway_core::{CancellationFlag, Error, Result};
use causeway_graph::{Graph, NodeIndex, Triple};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Types
// ============================================================================

/// How unshielded triples are classified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderStrategy {
    /// Use the separating sets recorded during adjacency search (PC).
    #[default]
    Sepsets,
    /// Re-test and require agreement of every minimal separating set (CPC).
    Conservative,
    /// Use the separating set with the highest statistic (PC-Max).
    MaxP,
}

impl ColliderStrategy {
    /// Configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sepsets => "sepsets",
            Self::Conservative => "conservative",
            Self::MaxP => "max_p",
        }
    }
}

impl fmt::Display for ColliderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColliderStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "sepsets" | "pc" => Ok(Self::Sepsets),
            "conservative" | "cpc" => Ok(Self::Conservative),
            "max_p" | "maxp" | "pc_max" => Ok(Self::MaxP),
            other => Err(Error::config(format!("unknown collider strategy '{other}'"))),
        }
    }
}

/// Classification of one triple.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Verdict {
    Collider(f64),
    Noncollider,
    Ambiguous,
}

/// Result of collider classification.
#[derive(Clone, Debug, Default)]
pub struct ColliderOutcome {
    /// Triples classified as colliders, oriented or not.
    pub colliders: BTreeSet<Triple>,
    /// Triples classified as noncolliders.
    pub noncolliders: BTreeSet<Triple>,
    /// Triples that could not be classified.
    pub ambiguous: BTreeSet<Triple>,
    /// Minimal separating sets found by re-testing (conservative only).
    pub minimal_sepsets: SepsetsMinimal,
    /// Colliders actually written into the graph.
    pub oriented: usize,
    /// Whether classification stopped on cancellation.
    pub interrupted: bool,
}

// ============================================================================
// Orienter
// ============================================================================

/// Classifies unshielded triples and orients the colliders.
#[derive(Clone, Debug)]
pub struct ColliderOrienter<'k> {
    strategy: ColliderStrategy,
    policy: ConflictPolicy,
    knowledge: &'k Knowledge,
    depth: usize,
    max_path_length: Option<usize>,
    prevent_cycles: bool,
    cancel: Option<CancellationFlag>,
}

impl<'k> ColliderOrienter<'k> {
    /// Create an orienter; re-testing strategies use subsets up to `depth`.
    pub fn new(
        strategy: ColliderStrategy,
        policy: ConflictPolicy,
        knowledge: &'k Knowledge,
        depth: usize,
    ) -> Self {
        Self {
            strategy,
            policy,
            knowledge,
            depth,
            max_path_length: None,
            prevent_cycles: false,
            cancel: None,
        }
    }

    /// For max-p: let the recorded sepset decide triples whose ends are
    /// not joined by a path of at most `length` edges avoiding the middle.
    pub fn with_path_heuristic(mut self, length: Option<usize>) -> Self {
        self.max_path_length = length;
        self
    }

    /// Skip colliders that would close a directed cycle.
    pub fn prevent_cycles(mut self, prevent: bool) -> Self {
        self.prevent_cycles = prevent;
        self
    }

    /// Poll `flag` between triples and tests.
    pub fn with_cancellation(mut self, flag: Option<CancellationFlag>) -> Self {
        self.cancel = flag;
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled)
    }

    /// Classify every unshielded triple of `graph` and orient colliders.
    pub fn orient(
        &self,
        graph: &mut Graph,
        sepsets: &SepsetMap,
        session: &mut OracleSession<'_>,
    ) -> Result<ColliderOutcome> {
        let mut outcome = ColliderOutcome::default();
        let mut pending: Vec<(NodeIndex, NodeIndex, NodeIndex, f64)> = Vec::new();

        for (x, y, z) in graph.unshielded_triples() {
            if self.cancelled() {
                outcome.interrupted = true;
                break;
            }
            let verdict = match self.strategy {
                ColliderStrategy::Sepsets => sepset_verdict(graph, sepsets, x, y, z)?,
                ColliderStrategy::Conservative => {
                    match self.conservative_verdict(graph, session, &mut outcome, x, y, z)? {
                        Some(v) => v,
                        None => {
                            outcome.interrupted = true;
                            break;
                        }
                    }
                }
                ColliderStrategy::MaxP => match self.max_p_verdict(graph, sepsets, session, x, y, z)? {
                    Some(v) => v,
                    None => {
                        outcome.interrupted = true;
                        break;
                    }
                },
            };

            let triple = Triple::from_indices(graph, x, y, z)?;
            match verdict {
                Verdict::Collider(score) => {
                    outcome.colliders.insert(triple);
                    pending.push((x, y, z, score));
                }
                Verdict::Noncollider => {
                    outcome.noncolliders.insert(triple);
                }
                Verdict::Ambiguous => {
                    outcome.ambiguous.insert(triple);
                }
            }

            // Sepset and conservative orient in visiting order.
            if self.strategy != ColliderStrategy::MaxP {
                for (x, y, z, _) in pending.drain(..) {
                    if self.orient_collider(graph, x, y, z)? {
                        outcome.oriented += 1;
                    }
                }
            }
        }

        if self.strategy == ColliderStrategy::MaxP && !outcome.interrupted {
            // Strongest evidence first; the sort is stable so ties keep
            // visiting order.
            pending.sort_by(|a, b| b.3.total_cmp(&a.3));
            for (x, y, z, _) in pending {
                if self.orient_collider(graph, x, y, z)? {
                    outcome.oriented += 1;
                }
            }
        }

        log::info!(
            "{} classification: {} colliders ({} oriented), {} noncolliders, {} ambiguous",
            self.strategy,
            outcome.colliders.len(),
            outcome.oriented,
            outcome.noncolliders.len(),
            outcome.ambiguous.len()
        );
        Ok(outcome)
    }

    /// Every separating set of `x` and `z` among subsets of size up to the
    /// depth bound of `adj(x)\{z}`, then of `adj(z)\{x}`, each set tested
    /// once. `None` when cancelled.
    fn separating_sets(
        &self,
        graph: &Graph,
        session: &mut OracleSession<'_>,
        x: NodeIndex,
        z: NodeIndex,
    ) -> Result<Option<Vec<(Vec<NodeIndex>, f64)>>> {
        let sides = [
            without(graph.adjacent_nodes(x), z),
            without(graph.adjacent_nodes(z), x),
        ];
        let mut tested: BTreeSet<Vec<NodeIndex>> = BTreeSet::new();
        let mut found = Vec::new();

        for side in &sides {
            for size in 0..=self.depth.min(side.len()) {
                for subset in subsets_of_size(side, size) {
                    if self.cancelled() {
                        return Ok(None);
                    }
                    let mut key = subset.clone();
                    key.sort();
                    if !tested.insert(key) {
                        continue;
                    }
                    let result = session.test(graph, x, z, &subset)?;
                    if result.independent {
                        found.push((subset, result.statistic));
                    }
                }
            }
        }
        Ok(Some(found))
    }

    fn conservative_verdict(
        &self,
        graph: &Graph,
        session: &mut OracleSession<'_>,
        outcome: &mut ColliderOutcome,
        x: NodeIndex,
        y: NodeIndex,
        z: NodeIndex,
    ) -> Result<Option<Verdict>> {
        let Some(found) = self.separating_sets(graph, session, x, z)? else {
            return Ok(None);
        };
        let (x_name, z_name) = (graph.name_of(x)?, graph.name_of(z)?);
        for (set, _) in found {
            let names = set
                .iter()
                .map(|&n| graph.name_of(n).map(str::to_string))
                .collect::<Result<Vec<_>>>()?;
            outcome.minimal_sepsets.add(x_name, z_name, names);
        }

        let minimal = outcome.minimal_sepsets.get(x_name, z_name);
        if minimal.is_empty() {
            return Ok(Some(Verdict::Ambiguous));
        }
        let y_name = graph.name_of(y)?;
        let containing = minimal
            .iter()
            .filter(|set| set.iter().any(|n| n == y_name))
            .count();
        Ok(Some(if containing == 0 {
            Verdict::Collider(0.0)
        } else if containing == minimal.len() {
            Verdict::Noncollider
        } else {
            Verdict::Ambiguous
        }))
    }

    fn max_p_verdict(
        &self,
        graph: &Graph,
        sepsets: &SepsetMap,
        session: &mut OracleSession<'_>,
        x: NodeIndex,
        y: NodeIndex,
        z: NodeIndex,
    ) -> Result<Option<Verdict>> {
        if let Some(length) = self.max_path_length
            && !graph.exists_short_path(x, z, length, Some(y))
        {
            return Ok(Some(sepset_verdict(graph, sepsets, x, y, z)?));
        }

        let Some(found) = self.separating_sets(graph, session, x, z)? else {
            return Ok(None);
        };
        let mut best: Option<(Vec<NodeIndex>, f64)> = None;
        for (set, statistic) in found {
            // strictly greater: the first set wins ties
            if best.as_ref().is_none_or(|(_, s)| statistic > *s) {
                best = Some((set, statistic));
            }
        }
        Ok(Some(match best {
            None => Verdict::Ambiguous,
            Some((set, statistic)) if !set.contains(&y) => Verdict::Collider(statistic),
            Some(_) => Verdict::Noncollider,
        }))
    }

    /// Write `x --> y <-- z`, subject to knowledge, cycle prevention and
    /// the conflict policy. Returns whether the graph changed.
    pub fn orient_collider(
        &self,
        graph: &mut Graph,
        x: NodeIndex,
        y: NodeIndex,
        z: NodeIndex,
    ) -> Result<bool> {
        let (xn, yn, zn) = (graph.name_of(x)?, graph.name_of(y)?, graph.name_of(z)?);
        if !collider_allowed(self.knowledge, xn, yn) || !collider_allowed(self.knowledge, zn, yn) {
            log::debug!("collider {xn} --> {yn} <-- {zn} blocked by knowledge");
            return Ok(false);
        }
        if self.prevent_cycles && (graph.would_create_cycle(x, y) || graph.would_create_cycle(z, y)) {
            log::debug!("collider {xn} --> {yn} <-- {zn} would create a cycle");
            return Ok(false);
        }

        let current = |from: NodeIndex| -> Result<EndpointPair> {
            match (graph.endpoint(y, from), graph.endpoint(from, y)) {
                (Some(at_x), Some(at_y)) => Ok(EndpointPair::new(at_x, at_y)),
                _ => Err(Error::graph(format!(
                    "collider edge {} - {yn} missing",
                    graph.name_of(from)?
                ))),
            }
        };
        let (Some(first), Some(second)) = (
            self.policy.resolve(current(x)?),
            self.policy.resolve(current(z)?),
        ) else {
            log::debug!("collider {xn} --> {yn} <-- {zn} refused by {}", self.policy);
            return Ok(false);
        };

        log::debug!("orienting collider {xn} --> {yn} <-- {zn}");
        graph.set_edge(x, y, first.at_x, first.at_y)?;
        graph.set_edge(z, y, second.at_x, second.at_y)?;
        Ok(true)
    }
}

fn without(mut nodes: Vec<NodeIndex>, excluded: NodeIndex) -> Vec<NodeIndex> {
    nodes.retain(|&n| n != excluded);
    nodes
}

fn sepset_verdict(
    graph: &Graph,
    sepsets: &SepsetMap,
    x: NodeIndex,
    y: NodeIndex,
    z: NodeIndex,
) -> Result<Verdict> {
    let (x_name, y_name, z_name) = (graph.name_of(x)?, graph.name_of(y)?, graph.name_of(z)?);
    Ok(match sepsets.get(x_name, z_name) {
        None => Verdict::Ambiguous,
        Some(set) if set.iter().any(|n| n == y_name) => Verdict::Noncollider,
        Some(_) => Verdict::Collider(sepsets.statistic(x_name, z_name).unwrap_or(0.0)),
    })
}

/// Whether knowledge permits an arrowhead at `into` on `from` - `into`.
fn collider_allowed(knowledge: &Knowledge, from: &str, into: &str) -> bool {
    !knowledge.is_forbidden(from, into) && !knowledge.is_required(into, from)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fas::{Fas, NO_DEPTH_BOUND};
    use crate::oracle::{DSeparationOracle, IndependenceOracle, IndependenceResult};
    use causeway_graph::{Edge, Node};

    fn dag(names: &[&str], edges: &[(&str, &str)]) -> Graph {
        let mut dag = Graph::from_nodes(names.iter().map(|n| Node::new(*n))).unwrap();
        for (from, to) in edges {
            dag.add_named_edge(&Edge::directed(*from, *to)).unwrap();
        }
        dag
    }

    fn collider_dag() -> Graph {
        dag(&["A", "B", "C", "D"], &[("A", "B"), ("C", "B"), ("B", "D")])
    }

    fn classify(
        strategy: ColliderStrategy,
        truth: Graph,
    ) -> (Graph, ColliderOutcome) {
        let knowledge = Knowledge::empty();
        let mut oracle = DSeparationOracle::new(truth).unwrap();
        let mut session = OracleSession::new(&mut oracle).unwrap();
        let fas = Fas::new(NO_DEPTH_BOUND, &knowledge)
            .search(&mut session, None)
            .unwrap();
        let mut graph = fas.graph;
        let outcome = ColliderOrienter::new(
            strategy,
            ConflictPolicy::PrioritizeExisting,
            &knowledge,
            NO_DEPTH_BOUND,
        )
        .orient(&mut graph, &fas.sepsets, &mut session)
        .unwrap();
        (graph, outcome)
    }

    #[test]
    fn test_all_strategies_find_the_collider() {
        for strategy in [
            ColliderStrategy::Sepsets,
            ColliderStrategy::Conservative,
            ColliderStrategy::MaxP,
        ] {
            let (graph, outcome) = classify(strategy, collider_dag());

            assert_eq!(
                outcome.colliders.iter().collect::<Vec<_>>(),
                vec![&Triple::new("A", "B", "C")],
                "{strategy}"
            );
            assert!(outcome.noncolliders.contains(&Triple::new("A", "B", "D")));
            assert!(outcome.noncolliders.contains(&Triple::new("C", "B", "D")));
            assert!(outcome.ambiguous.is_empty());
            assert_eq!(outcome.oriented, 1);

            let edges = graph.edges();
            assert!(edges.contains(&Edge::directed("A", "B")));
            assert!(edges.contains(&Edge::directed("C", "B").canonical()));
            assert!(edges.contains(&Edge::undirected("B", "D")));
        }
    }

    #[test]
    fn test_sepset_soundness_on_constructed_fixture() {
        // Skeleton X - Y - Z, W - Y with hand-written sepsets.
        let mut graph = Graph::from_nodes(["W", "X", "Y", "Z"].map(Node::new)).unwrap();
        for (a, b) in [("X", "Y"), ("Y", "Z"), ("W", "Y")] {
            graph.add_named_edge(&Edge::undirected(a, b)).unwrap();
        }
        let mut sepsets = SepsetMap::new();
        sepsets.put("X", "Z", Vec::<String>::new(), 1.0);
        sepsets.put("W", "X", ["Y"], 1.0);
        // W, Z: no recorded sepset

        let knowledge = Knowledge::empty();
        let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();
        let mut session = OracleSession::new(&mut oracle).unwrap();
        let outcome = ColliderOrienter::new(
            ColliderStrategy::Sepsets,
            ConflictPolicy::OrientBidirected,
            &knowledge,
            0,
        )
        .orient(&mut graph, &sepsets, &mut session)
        .unwrap();

        assert!(outcome.colliders.contains(&Triple::new("X", "Y", "Z")));
        assert!(outcome.noncolliders.contains(&Triple::new("W", "Y", "X")));
        assert!(outcome.ambiguous.contains(&Triple::new("W", "Y", "Z")));
        assert_eq!(session.calls(), 0);
    }

    #[test]
    fn test_knowledge_blocks_orientation_but_records_collider() {
        let knowledge = Knowledge::builder().forbid("A", "B").build().unwrap();
        let mut oracle = DSeparationOracle::new(collider_dag()).unwrap();
        let mut session = OracleSession::new(&mut oracle).unwrap();
        let fas = Fas::new(NO_DEPTH_BOUND, &knowledge)
            .search(&mut session, None)
            .unwrap();
        let mut graph = fas.graph;

        let outcome = ColliderOrienter::new(
            ColliderStrategy::Sepsets,
            ConflictPolicy::PrioritizeExisting,
            &knowledge,
            NO_DEPTH_BOUND,
        )
        .orient(&mut graph, &fas.sepsets, &mut session)
        .unwrap();

        assert!(outcome.colliders.contains(&Triple::new("A", "B", "C")));
        assert_eq!(outcome.oriented, 0);
        assert!(graph.edges().iter().all(|e| !e.is_directed()));
    }

    #[test]
    fn test_prioritize_existing_refuses_whole_collider() {
        // X - Y - Z with Y --> X already oriented.
        let mut graph = Graph::from_nodes(["X", "Y", "Z"].map(Node::new)).unwrap();
        graph.add_named_edge(&Edge::directed("Y", "X")).unwrap();
        graph.add_named_edge(&Edge::undirected("Y", "Z")).unwrap();
        let (x, y, z) = (
            graph.node_index("X").unwrap(),
            graph.node_index("Y").unwrap(),
            graph.node_index("Z").unwrap(),
        );
        let knowledge = Knowledge::empty();

        let prioritize = ColliderOrienter::new(
            ColliderStrategy::Sepsets,
            ConflictPolicy::PrioritizeExisting,
            &knowledge,
            0,
        );
        assert!(!prioritize.orient_collider(&mut graph.clone(), x, y, z).unwrap());

        let mut bidirected = graph.clone();
        let orient_bidirected = ColliderOrienter::new(
            ColliderStrategy::Sepsets,
            ConflictPolicy::OrientBidirected,
            &knowledge,
            0,
        );
        assert!(orient_bidirected.orient_collider(&mut bidirected, x, y, z).unwrap());
        assert!(bidirected.is_bidirected(x, y));
        assert!(bidirected.is_directed_from_to(z, y));

        let mut overwritten = graph.clone();
        let overwrite = ColliderOrienter::new(
            ColliderStrategy::Sepsets,
            ConflictPolicy::OverwriteExisting,
            &knowledge,
            0,
        );
        assert!(overwrite.orient_collider(&mut overwritten, x, y, z).unwrap());
        assert!(overwritten.is_directed_from_to(x, y));
    }

    /// Oracle with scripted statistics for X _||_ Z given subsets of {Y, W}.
    struct ScriptedOracle;

    impl IndependenceOracle for ScriptedOracle {
        fn variables(&self) -> Vec<Node> {
            ["W", "X", "Y", "Z"].map(Node::new).to_vec()
        }

        fn check_independence(&mut self, _: &Node, _: &Node, z: &[Node]) -> Result<IndependenceResult> {
            let names: Vec<&str> = z.iter().map(|n| n.name.as_str()).collect();
            Ok(match names.as_slice() {
                ["W"] => IndependenceResult::independent(0.4),
                ["Y"] => IndependenceResult::independent(0.9),
                _ => IndependenceResult::dependent(0.01),
            })
        }
    }

    fn scripted_skeleton() -> Graph {
        // X - Y - Z and X - W - Z
        let mut graph = Graph::from_nodes(["W", "X", "Y", "Z"].map(Node::new)).unwrap();
        for (a, b) in [("X", "Y"), ("Y", "Z"), ("W", "X"), ("W", "Z")] {
            graph.add_named_edge(&Edge::undirected(a, b)).unwrap();
        }
        graph
    }

    #[test]
    fn test_conservative_marks_disagreement_ambiguous() {
        let mut graph = scripted_skeleton();
        let knowledge = Knowledge::empty();
        let mut oracle = ScriptedOracle;
        let mut session = OracleSession::new(&mut oracle).unwrap();

        let outcome = ColliderOrienter::new(
            ColliderStrategy::Conservative,
            ConflictPolicy::PrioritizeExisting,
            &knowledge,
            1,
        )
        .orient(&mut graph, &SepsetMap::new(), &mut session)
        .unwrap();

        // {W} and {Y} both separate X and Z: Y is in one of them.
        assert!(outcome.ambiguous.contains(&Triple::new("X", "Y", "Z")));
        assert!(outcome.ambiguous.contains(&Triple::new("X", "W", "Z")));
        assert_eq!(outcome.minimal_sepsets.get("X", "Z").len(), 2);
        assert_eq!(outcome.oriented, 0);
    }

    #[test]
    fn test_max_p_picks_highest_statistic() {
        let mut graph = scripted_skeleton();
        let knowledge = Knowledge::empty();
        let mut oracle = ScriptedOracle;
        let mut session = OracleSession::new(&mut oracle).unwrap();

        let outcome = ColliderOrienter::new(
            ColliderStrategy::MaxP,
            ConflictPolicy::PrioritizeExisting,
            &knowledge,
            1,
        )
        .orient(&mut graph, &SepsetMap::new(), &mut session)
        .unwrap();

        // {Y} (0.9) beats {W} (0.4): X - Y - Z is a noncollider and
        // X - W - Z a collider.
        assert!(outcome.noncolliders.contains(&Triple::new("X", "Y", "Z")));
        assert!(outcome.colliders.contains(&Triple::new("X", "W", "Z")));
        let (w, x) = (graph.node_index("W").unwrap(), graph.node_index("X").unwrap());
        assert!(graph.is_directed_from_to(x, w));
    }

    #[test]
    fn test_max_p_path_heuristic_uses_recorded_sepset() {
        let mut graph = Graph::from_nodes(["X", "Y", "Z"].map(Node::new)).unwrap();
        graph.add_named_edge(&Edge::undirected("X", "Y")).unwrap();
        graph.add_named_edge(&Edge::undirected("Y", "Z")).unwrap();
        let mut sepsets = SepsetMap::new();
        sepsets.put("X", "Z", ["Y"], 1.0);

        let knowledge = Knowledge::empty();
        let mut oracle = DSeparationOracle::new(dag(&["X", "Y", "Z"], &[("X", "Y"), ("Y", "Z")]))
            .unwrap();
        let mut session = OracleSession::new(&mut oracle).unwrap();

        let outcome = ColliderOrienter::new(
            ColliderStrategy::MaxP,
            ConflictPolicy::PrioritizeExisting,
            &knowledge,
            NO_DEPTH_BOUND,
        )
        .with_path_heuristic(Some(3))
        .orient(&mut graph, &sepsets, &mut session)
        .unwrap();

        assert!(outcome.noncolliders.contains(&Triple::new("X", "Y", "Z")));
        assert_eq!(session.calls(), 0);
    }

    #[test]
    fn test_cancellation_stops_classification() {
        let flag = CancellationFlag::new();
        flag.cancel();
        let mut graph = scripted_skeleton();
        let knowledge = Knowledge::empty();
        let mut oracle = ScriptedOracle;
        let mut session = OracleSession::new(&mut oracle).unwrap();

        let outcome = ColliderOrienter::new(
            ColliderStrategy::Sepsets,
            ConflictPolicy::PrioritizeExisting,
            &knowledge,
            1,
        )
        .with_cancellation(Some(flag))
        .orient(&mut graph, &SepsetMap::new(), &mut session)
        .unwrap();

        assert!(outcome.interrupted);
        assert!(outcome.colliders.is_empty() && outcome.ambiguous.is_empty());
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("cpc".parse::<ColliderStrategy>().unwrap(), ColliderStrategy::Conservative);
        assert_eq!("max-p".parse::<ColliderStrategy>().unwrap(), ColliderStrategy::MaxP);
        assert_eq!(ColliderStrategy::MaxP.to_string(), "max_p");
        assert!("fci".parse::<ColliderStrategy>().is_err());
    }
}
