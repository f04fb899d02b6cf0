//! Constraint-based causal structure search for Causeway.
//!
//! The crate turns conditional-independence judgments from an
//! [`IndependenceOracle`] into a partially oriented causal graph.
//!
//! # Key Abstractions
//!
//! - [`IndependenceOracle`]: external source of independence verdicts
//! - [`Knowledge`]: forbidden and required edges plus temporal tiers
//! - [`Fas`]: adjacency search producing the skeleton and a [`SepsetMap`]
//! - [`ColliderOrienter`]: unshielded-triple classification under a
//!   [`ColliderStrategy`] and a [`ConflictPolicy`]
//! - [`MeekRules`]: fixpoint orientation propagation
//! - [`PcSearch`]: the orchestrator tying the phases together

#![doc = include_str!("../README.md")]

pub mod collider;
pub mod conflict;
pub mod fas;
pub mod knowledge;
pub mod meek;
pub mod oracle;
pub mod result;
pub mod search;
pub mod sepset;
pub mod subsets;

pub use collider::{ColliderOrienter, ColliderOutcome, ColliderStrategy};
pub use conflict::{ConflictPolicy, EndpointPair};
pub use fas::{Fas, FasOutcome, NO_DEPTH_BOUND};
pub use knowledge::{Knowledge, KnowledgeBuilder, KnowledgeFile, Tier, load_knowledge};
pub use meek::{MeekOutcome, MeekRules};
pub use oracle::{DSeparationOracle, IndependenceOracle, IndependenceResult, OracleSession};
pub use result::{StoredSearchResult, load_result, result_to_string, save_result};
pub use search::{PcSearch, SearchConfig, SearchResult, SearchStats};
pub use sepset::{SepsetMap, SepsetsMinimal};
