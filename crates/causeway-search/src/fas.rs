//! Fast adjacency search.
//!
//! Starting from a complete undirected graph, an edge `x - y` is removed
//! as soon as some subset of the current adjacents of `x` or of `y`
//! renders the pair independent. Subset sizes grow one depth at a time.

use crate::knowledge::Knowledge;
use crate::oracle::OracleSession;
use crate::sepset::SepsetMap;
use crate::subsets::subsets_of_size;
use causeway_core::{CancellationFlag, Error, Result};
use causeway_graph::{Endpoint, Graph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Depth used when the configured bound is `-1`.
pub const NO_DEPTH_BOUND: usize = 1000;

/// Map a configured bound (`-1` meaning "none") to a concrete depth.
pub fn depth_bound(configured: i64) -> Result<usize> {
    match configured {
        -1 => Ok(NO_DEPTH_BOUND),
        d if d < -1 => Err(Error::config(format!(
            "depth must be -1 or non-negative, got {d}"
        ))),
        d => Ok(usize::try_from(d).unwrap_or(NO_DEPTH_BOUND).min(NO_DEPTH_BOUND)),
    }
}

/// Result of an adjacency search.
#[derive(Clone, Debug)]
pub struct FasOutcome {
    /// The undirected skeleton.
    pub graph: Graph,
    /// Separating sets of the removed edges.
    pub sepsets: SepsetMap,
    /// Deepest conditioning-set size that was searched.
    pub depth_reached: usize,
    /// Edges removed by knowledge before testing.
    pub removed_by_knowledge: usize,
    /// Edges removed by independence tests.
    pub removed_by_tests: usize,
    /// Whether the search stopped on cancellation.
    pub interrupted: bool,
}

/// Adjacency search configuration.
#[derive(Clone, Debug)]
pub struct Fas<'k> {
    depth: usize,
    stable: bool,
    knowledge: &'k Knowledge,
    cancel: Option<CancellationFlag>,
}

impl<'k> Fas<'k> {
    /// Search up to conditioning sets of size `depth`.
    pub fn new(depth: usize, knowledge: &'k Knowledge) -> Self {
        Self {
            depth,
            stable: true,
            knowledge,
            cancel: None,
        }
    }

    /// Snapshot adjacencies at the start of each depth round.
    pub fn stable(mut self, stable: bool) -> Self {
        self.stable = stable;
        self
    }

    /// Poll `flag` between tests.
    pub fn with_cancellation(mut self, flag: Option<CancellationFlag>) -> Self {
        self.cancel = flag;
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled)
    }

    /// Run the search over the session's variables.
    ///
    /// With `initial`, only its adjacencies are candidates; its marks are
    /// discarded.
    pub fn search(
        &self,
        session: &mut OracleSession<'_>,
        initial: Option<&Graph>,
    ) -> Result<FasOutcome> {
        let equality = initial.map_or(session.equality(), Graph::equality);
        let mut graph = Graph::with_equality(equality);
        for node in session.variables() {
            graph.add_node(node.clone())?;
        }
        match initial {
            Some(initial) => {
                for (a, b) in initial.edge_pairs() {
                    let x = resolve_initial(&graph, initial, a)?;
                    let y = resolve_initial(&graph, initial, b)?;
                    graph.add_undirected_edge(x, y)?;
                }
            }
            None => graph.fully_connect(Endpoint::Tail),
        }

        let mut outcome = FasOutcome {
            graph,
            sepsets: SepsetMap::new(),
            depth_reached: 0,
            removed_by_knowledge: 0,
            removed_by_tests: 0,
            interrupted: false,
        };

        self.remove_forbidden(&mut outcome)?;

        for depth in 0..=self.depth {
            if depth > 0 && !has_free_degree(&outcome.graph, depth) {
                break;
            }
            outcome.depth_reached = depth;
            if !self.search_depth(session, &mut outcome, depth)? {
                outcome.interrupted = true;
                log::warn!("adjacency search interrupted at depth {depth}");
                break;
            }
        }

        log::info!(
            "adjacency search: {} edges remain, {} removed by tests, {} by knowledge, depth {}",
            outcome.graph.edge_count(),
            outcome.removed_by_tests,
            outcome.removed_by_knowledge,
            outcome.depth_reached
        );
        Ok(outcome)
    }

    fn remove_forbidden(&self, outcome: &mut FasOutcome) -> Result<()> {
        if self.knowledge.is_empty() {
            return Ok(());
        }
        for (a, b) in outcome.graph.edge_pairs() {
            let (x, y) = (outcome.graph.name_of(a)?, outcome.graph.name_of(b)?);
            if self.knowledge.is_adjacency_forbidden(x, y) {
                log::debug!("removing {x} - {y}: forbidden by knowledge");
                outcome.graph.remove_edge(a, b);
                outcome.removed_by_knowledge += 1;
            }
        }
        Ok(())
    }

    /// One depth round. Returns `false` when cancelled.
    fn search_depth(
        &self,
        session: &mut OracleSession<'_>,
        outcome: &mut FasOutcome,
        depth: usize,
    ) -> Result<bool> {
        let snapshot: Option<HashMap<NodeIndex, Vec<NodeIndex>>> = self.stable.then(|| {
            outcome
                .graph
                .node_indices()
                .into_iter()
                .map(|n| (n, outcome.graph.adjacent_nodes(n)))
                .collect()
        });

        for (x, y) in outcome.graph.edge_pairs() {
            if !outcome.graph.is_adjacent(x, y) {
                continue;
            }
            let (x_name, y_name) = (outcome.graph.name_of(x)?, outcome.graph.name_of(y)?);
            if self.knowledge.is_adjacency_required(x_name, y_name) {
                continue;
            }

            let adjacents = |n: NodeIndex, other: NodeIndex| -> Vec<NodeIndex> {
                let all = match &snapshot {
                    Some(s) => s.get(&n).cloned().unwrap_or_default(),
                    None => outcome.graph.adjacent_nodes(n),
                };
                all.into_iter().filter(|&m| m != other).collect()
            };
            let candidates = [adjacents(x, y), adjacents(y, x)];

            let mut tested: HashSet<Vec<NodeIndex>> = HashSet::new();
            let mut separated = None;
            'sides: for side in &candidates {
                for subset in subsets_of_size(side, depth) {
                    if self.cancelled() {
                        return Ok(false);
                    }
                    let mut key = subset.clone();
                    key.sort();
                    if !tested.insert(key) {
                        continue;
                    }
                    let result = session.test(&outcome.graph, x, y, &subset)?;
                    if result.independent {
                        separated = Some((subset, result.statistic));
                        break 'sides;
                    }
                }
            }

            if let Some((subset, statistic)) = separated {
                let names = subset
                    .iter()
                    .map(|&n| outcome.graph.name_of(n).map(str::to_string))
                    .collect::<Result<Vec<_>>>()?;
                let (x_name, y_name) = (
                    outcome.graph.name_of(x)?.to_string(),
                    outcome.graph.name_of(y)?.to_string(),
                );
                log::debug!("removing {x_name} - {y_name} | {names:?}");
                outcome.graph.remove_edge(x, y);
                outcome.sepsets.put(&x_name, &y_name, names, statistic);
                outcome.removed_by_tests += 1;
            }
        }
        Ok(true)
    }
}

/// The search graph's copy of node `idx` of the initial graph.
fn resolve_initial(graph: &Graph, initial: &Graph, idx: NodeIndex) -> Result<NodeIndex> {
    let node = initial
        .node(idx)
        .ok_or_else(|| Error::graph("initial graph edge references a missing node"))?;
    graph.resolve(node).ok_or_else(|| {
        Error::config(format!(
            "initial graph node '{}' is not an oracle variable",
            node.name
        ))
    })
}

/// Whether some edge has an endpoint with at least `depth` other adjacents.
fn has_free_degree(graph: &Graph, depth: usize) -> bool {
    graph
        .edge_pairs()
        .into_iter()
        .any(|(x, y)| graph.degree(x) > depth || graph.degree(y) > depth)
}

// ============================================================================
// Tests
// ============================================================================
