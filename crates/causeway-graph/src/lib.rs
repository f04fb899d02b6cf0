//! Causal graph infrastructure for Causeway.
//!
//! This crate provides the mixed-endpoint graph used throughout a search,
//! path algorithms over it, and JSON persistence.
//!
//! # Key Abstractions
//!
//! - [`Graph`]: nodes plus one edge per adjacent pair, with an
//!   [`Endpoint`] at each end
//! - [`Edge`]: a detached, named edge used for I/O and comparisons
//! - [`Triple`]: an unordered-ends node triple

#![doc = include_str!("../README.md")]

pub mod algorithms;
pub mod graph;
pub mod persistence;
pub mod stats;
pub mod triple;
pub mod types;
pub mod validation;

pub use graph::Graph;
pub use persistence::{
    GraphMetadata, SerializableGraph, graph_to_string, load_graph, load_graph_from_str, save_graph,
};
pub use petgraph::stable_graph::NodeIndex;
pub use stats::{DegreeDirection, GraphStats, compute_stats, quick_summary, top_nodes_by_degree};
pub use triple::Triple;
pub use types::{Edge, EdgeKind, Endpoint, Node, NodeEquality, NodeId, NodeType};
pub use validation::{ValidationIssue, ValidationResult, is_valid, validate_dag, validate_graph};
