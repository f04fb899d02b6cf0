//! Graph validation and integrity checking.
//!
//! Provides functions to validate graph structure and detect issues such
//! as directed cycles, isolated nodes, and edge kinds that do not belong
//! in a pattern (CPDAG) or a DAG.

use crate::graph::Graph;
use crate::types::{EdgeKind, Endpoint};
use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

/// Result of graph validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the graph is valid (no critical issues).
    pub valid: bool,
    /// Critical issues that should be fixed.
    pub errors: Vec<ValidationIssue>,
    /// Non-critical issues (warnings).
    pub warnings: Vec<ValidationIssue>,
    /// Informational findings.
    pub info: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new empty (valid) result.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    /// Add an error (marks graph as invalid).
    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.errors.push(issue);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Add an informational finding.
    pub fn add_info(&mut self, issue: ValidationIssue) {
        self.info.push(issue);
    }

    /// Total issue count (errors + warnings).
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A validation issue found in the graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue type/code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Affected node names (if applicable).
    pub nodes: Vec<String>,
    /// Affected edge descriptions (if applicable).
    pub edges: Vec<String>,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Attach affected nodes.
    pub fn with_nodes(mut self, nodes: Vec<String>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Attach affected edges.
    pub fn with_edges(mut self, edges: Vec<String>) -> Self {
        self.edges = edges;
        self
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate a search output graph.
///
/// Checks for:
/// - Directed cycles (error)
/// - Bidirected edges, which mark unresolved orientation conflicts (warning)
/// - Isolated nodes (warning)
/// - Circle endpoints and undirected edges (info)
pub fn validate_graph(graph: &Graph) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_directed_cycles(graph, &mut result);
    check_bidirected_edges(graph, &mut result);
    check_isolated_nodes(graph, &mut result);
    check_unoriented_edges(graph, &mut result);

    result
}

/// Validate that a graph is a DAG: every edge directed, no directed cycle.
///
/// Used before a graph is handed to a d-separation oracle.
pub fn validate_dag(graph: &Graph) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_directed_cycles(graph, &mut result);

    let non_directed: Vec<String> = graph
        .edges()
        .into_iter()
        .filter(|edge| !edge.is_directed())
        .map(|edge| edge.to_string())
        .collect();
    if !non_directed.is_empty() {
        result.add_error(
            ValidationIssue::new(
                "NON_DIRECTED_EDGES",
                format!("{} edge(s) are not directed", non_directed.len()),
            )
            .with_edges(non_directed),
        );
    }

    result
}

/// Quick check if graph has any validation errors.
pub fn is_valid(graph: &Graph) -> bool {
    validate_graph(graph).valid
}

// ============================================================================
// Individual checks
// ============================================================================

/// Check for directed cycles.
fn check_directed_cycles(graph: &Graph, result: &mut ValidationResult) {
    for cycle in graph.directed_cycles() {
        let nodes: Vec<String> = cycle
            .into_iter()
            .filter_map(|idx| graph.name(idx).map(str::to_string))
            .collect();
        result.add_error(
            ValidationIssue::new(
                "DIRECTED_CYCLE",
                format!("Directed cycle through {} node(s)", nodes.len()),
            )
            .with_nodes(nodes),
        );
    }
}

/// Check for bidirected edges.
fn check_bidirected_edges(graph: &Graph, result: &mut ValidationResult) {
    let bidirected: Vec<String> = graph
        .edges()
        .into_iter()
        .filter(|edge| edge.kind() == EdgeKind::Bidirected)
        .map(|edge| edge.to_string())
        .collect();

    if !bidirected.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "BIDIRECTED_EDGES",
                format!("{} bidirected edge(s) found", bidirected.len()),
            )
            .with_edges(bidirected),
        );
    }
}

/// Check for nodes with no incident edges.
fn check_isolated_nodes(graph: &Graph, result: &mut ValidationResult) {
    let isolated: Vec<String> = graph
        .node_indices()
        .into_iter()
        .filter(|&idx| graph.degree(idx) == 0)
        .filter_map(|idx| graph.name(idx).map(str::to_string))
        .collect();

    if !isolated.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "ISOLATED_NODES",
                format!("{} node(s) have no connections", isolated.len()),
            )
            .with_nodes(isolated),
        );
    }
}

/// Report edges that remain unoriented.
fn check_unoriented_edges(graph: &Graph, result: &mut ValidationResult) {
    let edges = graph.edges();

    let undirected = edges
        .iter()
        .filter(|e| e.kind() == EdgeKind::Undirected)
        .count();
    if undirected > 0 {
        result.add_info(ValidationIssue::new(
            "UNDIRECTED_EDGES",
            format!("{undirected} edge(s) left undirected"),
        ));
    }

    let circles: Vec<String> = edges
        .iter()
        .filter(|e| e.endpoint1 == Endpoint::Circle || e.endpoint2 == Endpoint::Circle)
        .map(|e| e.to_string())
        .collect();
    if !circles.is_empty() {
        result.add_info(
            ValidationIssue::new(
                "CIRCLE_ENDPOINTS",
                format!("{} edge(s) carry circle endpoints", circles.len()),
            )
            .with_edges(circles),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
