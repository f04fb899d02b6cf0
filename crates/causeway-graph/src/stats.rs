//! Graph statistics and analysis.
//!
//! Summaries of a search output: edge kind breakdown, degree extremes
//! and top-node rankings.

use crate::graph::Graph;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Types
// ============================================================================

/// Statistics about a graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphStats {
    /// Total number of nodes.
    pub node_count: usize,
    /// Total number of edges.
    pub edge_count: usize,
    /// Edges per kind (`directed`, `undirected`, ...).
    pub kind_distribution: BTreeMap<String, usize>,
    /// Nodes without any edges.
    pub isolated_count: usize,
    /// Average adjacencies per node.
    pub avg_degree: f32,
    /// Maximum number of parents of a node.
    pub max_in_degree: usize,
    /// Maximum number of children of a node.
    pub max_out_degree: usize,
    /// Node with the most parents.
    pub most_parents: Option<String>,
    /// Node with the most children.
    pub most_children: Option<String>,
}

/// Direction for degree calculation.
#[derive(Clone, Copy, Debug)]
pub enum DegreeDirection {
    /// Parents only (`p --> node`).
    In,
    /// Children only (`node --> c`).
    Out,
    /// Every adjacency, regardless of marks.
    Both,
}

// ============================================================================
// Functions
// ============================================================================

/// Compute statistics for a graph.
pub fn compute_stats(graph: &Graph) -> GraphStats {
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();

    let mut kind_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for edge in graph.edges() {
        *kind_distribution
            .entry(edge.kind().name().to_string())
            .or_insert(0) += 1;
    }

    let indices = graph.node_indices();
    let isolated_count = indices.iter().filter(|&&i| graph.degree(i) == 0).count();

    let avg_degree = if node_count > 0 {
        (2 * edge_count) as f32 / node_count as f32
    } else {
        0.0
    };

    let (most_parents, max_in_degree) = max_degree(graph, &indices, DegreeDirection::In);
    let (most_children, max_out_degree) = max_degree(graph, &indices, DegreeDirection::Out);

    GraphStats {
        node_count,
        edge_count,
        kind_distribution,
        isolated_count,
        avg_degree,
        max_in_degree,
        max_out_degree,
        most_parents,
        most_children,
    }
}

/// Get a quick summary of graph size.
pub fn quick_summary(graph: &Graph) -> String {
    format!("{} nodes, {} edges", graph.node_count(), graph.edge_count())
}

/// Get top N nodes by degree, ties broken by name.
pub fn top_nodes_by_degree(
    graph: &Graph,
    limit: usize,
    direction: DegreeDirection,
) -> Vec<(String, usize)> {
    let mut scores: Vec<(String, usize)> = graph
        .node_indices()
        .into_iter()
        .filter_map(|idx| Some((graph.name(idx)?.to_string(), degree(graph, idx, direction))))
        .collect();

    scores.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scores.truncate(limit);
    scores
}

fn degree(graph: &Graph, idx: NodeIndex, direction: DegreeDirection) -> usize {
    match direction {
        DegreeDirection::In => graph.parents(idx).len(),
        DegreeDirection::Out => graph.children(idx).len(),
        DegreeDirection::Both => graph.degree(idx),
    }
}

fn max_degree(
    graph: &Graph,
    indices: &[NodeIndex],
    direction: DegreeDirection,
) -> (Option<String>, usize) {
    indices
        .iter()
        .map(|&idx| (idx, degree(graph, idx, direction)))
        .filter(|&(_, d)| d > 0)
        // first node wins ties
        .fold(None, |best: Option<(NodeIndex, usize)>, (idx, d)| match best {
            Some((_, best_d)) if best_d >= d => best,
            _ => Some((idx, d)),
        })
        .map(|(idx, d)| (graph.name(idx).map(str::to_string), d))
        .unwrap_or((None, 0))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Edge, Node};

    // a --> b --> c <-- a, c --- d, e isolated
    fn create_test_graph() -> Graph {
        let mut graph = Graph::from_nodes(["a", "b", "c", "d", "e"].map(Node::new)).unwrap();
        for edge in [
            Edge::directed("a", "b"),
            Edge::directed("b", "c"),
            Edge::directed("a", "c"),
            Edge::undirected("c", "d"),
        ] {
            graph.add_named_edge(&edge).unwrap();
        }
        graph
    }

    #[test]
    fn test_compute_stats_basic_counts() {
        let stats = compute_stats(&create_test_graph());

        assert_eq!(stats.node_count, 5);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.isolated_count, 1);
    }

    #[test]
    fn test_compute_stats_kind_distribution() {
        let stats = compute_stats(&create_test_graph());

        assert_eq!(stats.kind_distribution["directed"], 3);
        assert_eq!(stats.kind_distribution["undirected"], 1);
        assert!(!stats.kind_distribution.contains_key("bidirected"));
    }

    #[test]
    fn test_compute_stats_avg_degree() {
        let stats = compute_stats(&create_test_graph());

        // 4 edges, 5 nodes: 8 / 5
        assert!((stats.avg_degree - 1.6).abs() < 0.01);
    }

    #[test]
    fn test_compute_stats_max_degrees() {
        let stats = compute_stats(&create_test_graph());

        assert_eq!(stats.max_in_degree, 2);
        assert_eq!(stats.most_parents.as_deref(), Some("c"));
        assert_eq!(stats.max_out_degree, 2);
        assert_eq!(stats.most_children.as_deref(), Some("a"));
    }

    #[test]
    fn test_compute_stats_empty_graph() {
        let stats = compute_stats(&Graph::new());

        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.avg_degree, 0.0);
        assert!(stats.most_parents.is_none());
        assert!(stats.most_children.is_none());
    }

    #[test]
    fn test_quick_summary() {
        assert_eq!(quick_summary(&create_test_graph()), "5 nodes, 4 edges");
        assert_eq!(quick_summary(&Graph::new()), "0 nodes, 0 edges");
    }

    #[test]
    fn test_top_nodes_by_degree() {
        let graph = create_test_graph();

        let top = top_nodes_by_degree(&graph, 1, DegreeDirection::Both);
        assert_eq!(top, vec![("c".to_string(), 3)]);

        let top = top_nodes_by_degree(&graph, 2, DegreeDirection::Out);
        assert_eq!(top[0], ("a".to_string(), 2));
        assert_eq!(top[1], ("b".to_string(), 1));
    }

    #[test]
    fn test_top_nodes_by_degree_empty_graph() {
        assert!(top_nodes_by_degree(&Graph::new(), 5, DegreeDirection::Both).is_empty());
    }

    #[test]
    fn test_graph_stats_serialization() {
        let stats = compute_stats(&create_test_graph());

        let json = serde_json::to_string(&stats).unwrap();
        let parsed: GraphStats = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.edge_count, stats.edge_count);
        assert_eq!(parsed.kind_distribution, stats.kind_distribution);
    }
}
