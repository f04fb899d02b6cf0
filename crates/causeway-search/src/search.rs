//! The search orchestrator.
//!
//! [`PcSearch`] owns the one mutable graph of a search and hands it by
//! `&mut` to each phase in turn:
//!
//! 1. adjacency search ([`Fas`]) builds the skeleton and the sepsets,
//! 2. required orientations from [`Knowledge`] are applied,
//! 3. a directed cycle at this point is a structural contradiction,
//! 4. unshielded triples are classified and colliders oriented,
//! 5. the Meek rules propagate orientations to a fixpoint.
//!
//! Cancellation is polled inside every phase. An interrupted search is not
//! an error: it returns the graph as far as it got with `complete = false`.

use crate::collider::{ColliderOrienter, ColliderStrategy};
use crate::conflict::ConflictPolicy;
use crate::fas::{Fas, depth_bound};
use crate::knowledge::Knowledge;
use crate::meek::{self, DEFAULT_MAX_PASSES, MeekRules};
use crate::oracle::{IndependenceOracle, OracleSession};
use crate::sepset::SepsetMap;
use causeway_core::{CancellationFlag, Error, Result};
use causeway_graph::{Graph, Triple};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Configuration
// ============================================================================

/// Knobs of one search run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Largest conditioning-set size; `-1` for unbounded.
    pub depth: i64,
    /// Freeze adjacencies per depth so the result ignores variable order.
    pub stable: bool,
    /// How unshielded triples are classified.
    pub collider_strategy: ColliderStrategy,
    /// How a collider settles marks already on its edges.
    pub conflict_policy: ConflictPolicy,
    /// Skip orientations that would close a directed cycle.
    pub prevent_cycles: bool,
    /// Path bound for the max-p heuristic; `-1` for unbounded.
    pub max_path_length: i64,
    /// Let the recorded sepset decide triples whose ends are far apart.
    pub use_max_p_heuristic: bool,
    /// Bound on full Meek passes.
    pub max_meek_passes: usize,
    /// Restart the Meek closure from the unshielded colliders.
    pub revert_to_unshielded_colliders: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: -1,
            stable: true,
            collider_strategy: ColliderStrategy::Sepsets,
            conflict_policy: ConflictPolicy::PrioritizeExisting,
            prevent_cycles: false,
            max_path_length: -1,
            use_max_p_heuristic: false,
            max_meek_passes: DEFAULT_MAX_PASSES,
            revert_to_unshielded_colliders: false,
        }
    }
}

impl SearchConfig {
    /// PC: collider decisions from the recorded sepsets.
    pub fn pc() -> Self {
        Self::default()
    }

    /// Conservative PC: collider decisions from all separating sets.
    pub fn cpc() -> Self {
        Self {
            collider_strategy: ColliderStrategy::Conservative,
            ..Self::default()
        }
    }

    /// PC-Max: collider decisions from the best-scoring separating set.
    pub fn pc_max() -> Self {
        Self {
            collider_strategy: ColliderStrategy::MaxP,
            ..Self::default()
        }
    }

    /// Same settings with another strategy.
    pub fn with_strategy(mut self, strategy: ColliderStrategy) -> Self {
        self.collider_strategy = strategy;
        self
    }

    /// Reject settings no search can run with.
    pub fn validate(&self) -> Result<()> {
        depth_bound(self.depth)?;
        if self.max_path_length < -1 {
            return Err(Error::config(format!(
                "max_path_length must be -1 or non-negative, got {}",
                self.max_path_length
            )));
        }
        if self.max_meek_passes == 0 {
            return Err(Error::config("max_meek_passes must be at least 1"));
        }
        Ok(())
    }

    fn path_heuristic(&self) -> Result<Option<usize>> {
        if self.use_max_p_heuristic && self.collider_strategy == ColliderStrategy::MaxP {
            depth_bound(self.max_path_length).map(Some)
        } else {
            Ok(None)
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Counters collected while searching.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchStats {
    /// Oracle calls across all phases.
    pub oracle_calls: usize,
    /// Deepest conditioning-set size the adjacency search reached.
    pub depth_reached: usize,
    /// Adjacencies removed by independence tests.
    pub edges_removed: usize,
    /// Adjacencies removed because knowledge forbids them.
    pub removed_by_knowledge: usize,
    /// Collider orientations applied.
    pub collider_orientations: usize,
    /// Required orientations applied.
    pub required_orientations: usize,
    /// Orientations made by the Meek rules.
    pub meek_orientations: usize,
    /// Full Meek passes.
    pub meek_passes: usize,
    /// Whether the Meek closure reached a fixpoint.
    pub meek_converged: bool,
}

/// Output of a search.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// The partially oriented graph.
    pub graph: Graph,
    /// Separating sets recorded by the adjacency search.
    pub sepsets: SepsetMap,
    /// Unshielded triples classified as colliders.
    pub collider_triples: BTreeSet<Triple>,
    /// Unshielded triples classified as noncolliders.
    pub noncollider_triples: BTreeSet<Triple>,
    /// Unshielded triples left undecided.
    pub ambiguous_triples: BTreeSet<Triple>,
    /// `false` when the search was cancelled.
    pub complete: bool,
    /// Counters.
    pub stats: SearchStats,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// A configured PC-family search over one oracle.
pub struct PcSearch<'o> {
    oracle: &'o mut dyn IndependenceOracle,
    config: SearchConfig,
    knowledge: Knowledge,
    initial: Option<Graph>,
    cancel: Option<CancellationFlag>,
}

impl<'o> PcSearch<'o> {
    /// Create a search with empty knowledge over the complete graph.
    pub fn new(oracle: &'o mut dyn IndependenceOracle, config: SearchConfig) -> Self {
        Self {
            oracle,
            config,
            knowledge: Knowledge::empty(),
            initial: None,
            cancel: None,
        }
    }

    /// Background knowledge.
    pub fn with_knowledge(mut self, knowledge: Knowledge) -> Self {
        self.knowledge = knowledge;
        self
    }

    /// Restrict candidate adjacencies to those of `graph`.
    pub fn with_initial_graph(mut self, graph: Graph) -> Self {
        self.initial = Some(graph);
        self
    }

    /// Poll `flag` throughout the run.
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run every phase and return the result.
    pub fn run(&mut self) -> Result<SearchResult> {
        self.config.validate()?;
        let depth = depth_bound(self.config.depth)?;
        let path_heuristic = self.config.path_heuristic()?;

        let mut session = OracleSession::new(&mut *self.oracle)?;
        self.knowledge
            .check_variables(session.variables().iter().map(|n| n.name.as_str()))?;

        log::info!(
            "starting {} search over {} variables (depth {}, stable {})",
            self.config.collider_strategy,
            session.variables().len(),
            self.config.depth,
            self.config.stable
        );

        // Adjacency search
        let fas = Fas::new(depth, &self.knowledge)
            .stable(self.config.stable)
            .with_cancellation(self.cancel.clone())
            .search(&mut session, self.initial.as_ref())?;

        let mut stats = SearchStats {
            depth_reached: fas.depth_reached,
            edges_removed: fas.removed_by_tests,
            removed_by_knowledge: fas.removed_by_knowledge,
            ..SearchStats::default()
        };
        let mut graph = fas.graph;
        let sepsets = fas.sepsets;

        if fas.interrupted {
            stats.oracle_calls = session.calls();
            return Ok(SearchResult {
                graph,
                sepsets,
                collider_triples: BTreeSet::new(),
                noncollider_triples: BTreeSet::new(),
                ambiguous_triples: BTreeSet::new(),
                complete: false,
                stats,
            });
        }

        // Required orientations, then the structural check
        stats.required_orientations = meek::apply_required(&mut graph, &self.knowledge)?;
        if graph.exists_directed_cycle() {
            let cycle: Vec<&str> = graph
                .directed_cycles()
                .first()
                .map(|c| c.iter().filter_map(|&n| graph.name(n)).collect())
                .unwrap_or_default();
            return Err(Error::structural(format!(
                "required orientations form a directed cycle: {}",
                cycle.join(" --> ")
            )));
        }

        // Colliders
        let colliders = ColliderOrienter::new(
            self.config.collider_strategy,
            self.config.conflict_policy,
            &self.knowledge,
            depth,
        )
        .with_path_heuristic(path_heuristic)
        .prevent_cycles(self.config.prevent_cycles)
        .with_cancellation(self.cancel.clone())
        .orient(&mut graph, &sepsets, &mut session)?;
        stats.collider_orientations = colliders.oriented;

        let mut complete = !colliders.interrupted;

        // Meek closure
        if complete {
            let closure = MeekRules::new(&self.knowledge)
                .prevent_cycles(self.config.prevent_cycles)
                .revert_to_unshielded_colliders(self.config.revert_to_unshielded_colliders)
                .max_passes(self.config.max_meek_passes)
                .with_cancellation(self.cancel.clone())
                .orient_implied(&mut graph)?;
            stats.meek_orientations = closure.oriented;
            stats.meek_passes = closure.passes;
            stats.meek_converged = closure.converged;
            stats.required_orientations += closure.required;
            complete = !closure.interrupted;
        }

        stats.oracle_calls = session.calls();
        log::info!(
            "search finished: {} edges, {} colliders, {} oracle calls{}",
            graph.edge_count(),
            colliders.colliders.len(),
            stats.oracle_calls,
            if complete { "" } else { " (interrupted)" }
        );

        Ok(SearchResult {
            graph,
            sepsets,
            collider_triples: colliders.colliders,
            noncollider_triples: colliders.noncolliders,
            ambiguous_triples: colliders.ambiguous,
            complete,
            stats,
        })
    }
}
