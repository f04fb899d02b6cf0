//! Meek orientation rules.
//!
//! After colliders are placed, undirected edges whose orientation is
//! forced by the existing arrows are oriented until nothing changes:
//!
//! - R1: `a --> b - c`, `a`, `c` nonadjacent: orient `b --> c`.
//! - R2: `a --> b --> c`, `a - c`: orient `a --> c`.
//! - R3: `a - b`, `a - c`, `a - d`, `c --> b <-- d`, `c`, `d` nonadjacent:
//!   orient `a --> b`.
//! - R4: `a - b`, `a - c`, `c --> d --> b`, `a` adjacent to `d`, `c`, `b`
//!   nonadjacent: orient `a --> b`.

use crate::knowledge::Knowledge;
use causeway_core::{CancellationFlag, Result};
use causeway_graph::{Endpoint, Graph, NodeIndex};

/// Default bound on full rule passes.
pub const DEFAULT_MAX_PASSES: usize = 10_000;

/// Result of running the rules to a fixpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeekOutcome {
    /// Edges oriented by the rules.
    pub oriented: usize,
    /// Required orientations that changed the graph.
    pub required: usize,
    /// Directed edges made undirected before the loop.
    pub reverted: usize,
    /// Full passes over the edges, including the final quiet one.
    pub passes: usize,
    /// Whether a quiet pass was reached within the bound.
    pub converged: bool,
    /// Whether the loop stopped on cancellation.
    pub interrupted: bool,
}

/// The rule engine.
#[derive(Clone, Debug)]
pub struct MeekRules<'k> {
    knowledge: &'k Knowledge,
    prevent_cycles: bool,
    revert_to_unshielded_colliders: bool,
    max_passes: usize,
    cancel: Option<CancellationFlag>,
}

impl<'k> MeekRules<'k> {
    /// Create the engine with default settings.
    pub fn new(knowledge: &'k Knowledge) -> Self {
        Self {
            knowledge,
            prevent_cycles: false,
            revert_to_unshielded_colliders: false,
            max_passes: DEFAULT_MAX_PASSES,
            cancel: None,
        }
    }

    /// Skip orientations that would close a directed cycle.
    pub fn prevent_cycles(mut self, prevent: bool) -> Self {
        self.prevent_cycles = prevent;
        self
    }

    /// Un-orient every edge that is not part of an unshielded collider
    /// before running the rules.
    pub fn revert_to_unshielded_colliders(mut self, revert: bool) -> Self {
        self.revert_to_unshielded_colliders = revert;
        self
    }

    /// Bound the number of full passes.
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes.max(1);
        self
    }

    /// Poll `flag` between passes and edges.
    pub fn with_cancellation(mut self, flag: Option<CancellationFlag>) -> Self {
        self.cancel = flag;
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled)
    }

    /// Orient every edge implied by the current arrows.
    pub fn orient_implied(&self, graph: &mut Graph) -> Result<MeekOutcome> {
        let mut outcome = MeekOutcome::default();

        if self.revert_to_unshielded_colliders {
            outcome.reverted = self.revert(graph)?;
        }
        outcome.required = apply_required(graph, self.knowledge)?;

        while outcome.passes < self.max_passes {
            outcome.passes += 1;
            let mut changed = false;

            for (a, b) in graph.edge_pairs() {
                if self.cancelled() {
                    outcome.interrupted = true;
                    log::warn!("orientation rules interrupted after {} passes", outcome.passes);
                    return Ok(outcome);
                }
                if !graph.is_undirected(a, b) {
                    continue;
                }
                for (from, to) in [(a, b), (b, a)] {
                    if let Some(rule) = self.implied_rule(graph, from, to)
                        && self.allowed(graph, from, to)?
                    {
                        log::debug!(
                            "{rule}: orienting {} --> {}",
                            graph.name_of(from)?,
                            graph.name_of(to)?
                        );
                        graph.set_endpoint(from, to, Endpoint::Arrow)?;
                        outcome.oriented += 1;
                        changed = true;
                        break;
                    }
                }
            }

            if !changed {
                outcome.converged = true;
                break;
            }
        }

        if !outcome.converged {
            log::warn!(
                "orientation rules did not converge within {} passes",
                self.max_passes
            );
        }
        log::info!(
            "orientation rules: {} oriented, {} required, {} passes",
            outcome.oriented,
            outcome.required,
            outcome.passes
        );
        Ok(outcome)
    }

    fn allowed(&self, graph: &Graph, from: NodeIndex, to: NodeIndex) -> Result<bool> {
        let (f, t) = (graph.name_of(from)?, graph.name_of(to)?);
        if self.knowledge.is_forbidden(f, t) || self.knowledge.is_required(t, f) {
            return Ok(false);
        }
        Ok(!(self.prevent_cycles && graph.would_create_cycle(from, to)))
    }

    /// The first rule that forces `from --> to` on the undirected edge.
    fn implied_rule(&self, graph: &Graph, from: NodeIndex, to: NodeIndex) -> Option<&'static str> {
        if r1(graph, from, to) {
            Some("R1")
        } else if r2(graph, from, to) {
            Some("R2")
        } else if r3(graph, from, to) {
            Some("R3")
        } else if r4(graph, from, to) {
            Some("R4")
        } else {
            None
        }
    }

    fn revert(&self, graph: &mut Graph) -> Result<usize> {
        // decided on the unmodified graph
        let mut targets: Vec<(NodeIndex, NodeIndex)> = Vec::new();
        for (a, b) in graph.edge_pairs() {
            let (from, to) = if graph.is_directed_from_to(a, b) {
                (a, b)
            } else if graph.is_directed_from_to(b, a) {
                (b, a)
            } else {
                continue;
            };
            if self.knowledge.is_required(graph.name_of(from)?, graph.name_of(to)?)
                || in_unshielded_collider(graph, from, to)
            {
                continue;
            }
            targets.push((from, to));
        }

        for &(from, to) in &targets {
            graph.set_edge(from, to, Endpoint::Tail, Endpoint::Tail)?;
        }
        Ok(targets.len())
    }
}

/// Orient every required edge present in `graph`. Returns the number of
/// edges that changed.
pub fn apply_required(graph: &mut Graph, knowledge: &Knowledge) -> Result<usize> {
    let mut changed = 0;
    for (from, to) in knowledge.required_edges() {
        let (Some(f), Some(t)) = (graph.node_index(from), graph.node_index(to)) else {
            continue;
        };
        if !graph.is_adjacent(f, t) || graph.is_directed_from_to(f, t) {
            continue;
        }
        log::debug!("required: orienting {from} --> {to}");
        graph.set_edge(f, t, Endpoint::Tail, Endpoint::Arrow)?;
        changed += 1;
    }
    Ok(changed)
}

/// Whether `from --> to` has a partner `c --> to` with `c`, `from`
/// nonadjacent.
fn in_unshielded_collider(graph: &Graph, from: NodeIndex, to: NodeIndex) -> bool {
    graph
        .parents(to)
        .into_iter()
        .any(|c| c != from && !graph.is_adjacent(c, from))
}

// ============================================================================
// Rules, each asking whether `a - b` must become `a --> b`
// ============================================================================

fn r1(graph: &Graph, a: NodeIndex, b: NodeIndex) -> bool {
    graph
        .parents(a)
        .into_iter()
        .any(|c| c != b && !graph.is_adjacent(c, b))
}

fn r2(graph: &Graph, a: NodeIndex, b: NodeIndex) -> bool {
    graph
        .children(a)
        .into_iter()
        .any(|c| graph.is_directed_from_to(c, b))
}

fn r3(graph: &Graph, a: NodeIndex, b: NodeIndex) -> bool {
    let candidates: Vec<NodeIndex> = graph
        .parents(b)
        .into_iter()
        .filter(|&c| graph.is_undirected(a, c))
        .collect();
    candidates.iter().enumerate().any(|(i, &c)| {
        candidates[i + 1..]
            .iter()
            .any(|&d| !graph.is_adjacent(c, d))
    })
}

fn r4(graph: &Graph, a: NodeIndex, b: NodeIndex) -> bool {
    graph
        .parents(b)
        .into_iter()
        .filter(|&d| d != a && graph.is_adjacent(a, d))
        .any(|d| {
            graph.parents(d).into_iter().any(|c| {
                c != a && c != b && graph.is_undirected(a, c) && !graph.is_adjacent(c, b)
            })
        })
}

// ============================================================================
// Tests
// ============================================================================
