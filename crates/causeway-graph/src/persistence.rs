//! Graph persistence.
//!
//! Graphs are stored as JSON: a node list, an edge list with explicit
//! endpoints, and optional metadata. The petgraph structure is rebuilt on
//! load.

use crate::graph::Graph;
use crate::types::{Edge, Node, NodeEquality};
use causeway_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Serializable types
// ============================================================================

/// Serializable representation of a graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SerializableGraph {
    /// All nodes in the graph.
    pub nodes: Vec<Node>,
    /// All edges in the graph, in canonical order.
    pub edges: Vec<Edge>,
    /// Node equality mode of the graph.
    #[serde(default)]
    pub equality: NodeEquality,
    /// Optional metadata about the graph.
    #[serde(default)]
    pub metadata: Option<GraphMetadata>,
}

impl SerializableGraph {
    /// Snapshot a graph.
    pub fn from_graph(graph: &Graph, metadata: Option<GraphMetadata>) -> Self {
        Self {
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges(),
            equality: graph.equality(),
            metadata,
        }
    }

    /// Rebuild a graph, skipping edges that reference missing nodes.
    pub fn into_graph(self) -> Result<Graph> {
        let mut graph = Graph::with_equality(self.equality);
        for node in self.nodes {
            graph.add_node(node)?;
        }

        for edge in &self.edges {
            if !graph.contains_node(&edge.node1) || !graph.contains_node(&edge.node2) {
                log::warn!("Skipping edge {edge}: references a missing node");
                continue;
            }
            graph.add_named_edge(edge)?;
        }

        Ok(graph)
    }
}

/// Metadata about a persisted graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphMetadata {
    /// When the graph was written (unix timestamp).
    pub built_at: String,
    /// Version of the writer.
    pub builder_version: String,
    /// Free-form description, e.g. the search that produced the graph.
    pub description: Option<String>,
}

impl Default for GraphMetadata {
    fn default() -> Self {
        Self {
            built_at: timestamp_now(),
            builder_version: env!("CARGO_PKG_VERSION").to_string(),
            description: None,
        }
    }
}

impl GraphMetadata {
    /// Metadata with a description.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }
}

/// Simple unix timestamp.
fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_secs())
}

// ============================================================================
// Save / Load
// ============================================================================

/// Save a graph to a JSON file.
pub fn save_graph(
    graph: &Graph,
    path: impl AsRef<Path>,
    metadata: Option<GraphMetadata>,
) -> Result<()> {
    let json = graph_to_string(graph, metadata)?;
    std::fs::write(path.as_ref(), json).map_err(|e| Error::io_with_path(e, path.as_ref()))?;
    log::debug!("Saved graph to {}", path.as_ref().display());
    Ok(())
}

/// Serialize a graph to pretty JSON.
pub fn graph_to_string(graph: &Graph, metadata: Option<GraphMetadata>) -> Result<String> {
    let serializable = SerializableGraph::from_graph(graph, metadata);
    Ok(serde_json::to_string_pretty(&serializable)?)
}

/// Load a graph from a JSON file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph> {
    let json = std::fs::read_to_string(path.as_ref())
        .map_err(|e| Error::io_with_path(e, path.as_ref()))?;

    load_graph_from_str(&json)
}

/// Load a graph from a JSON string.
pub fn load_graph_from_str(json: &str) -> Result<Graph> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|e| Error::parse(format!("Failed to parse graph JSON: {e}")))?;

    serializable.into_graph()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{EdgeKind, NodeType};
    use tempfile::tempdir;

    fn create_test_graph() -> Graph {
        let mut graph = Graph::from_nodes([
            Node::new("A"),
            Node::new("B"),
            Node::latent("L"),
        ])
        .unwrap();
        graph.add_named_edge(&Edge::directed("A", "B")).unwrap();
        graph.add_named_edge(&Edge::bidirected("B", "L")).unwrap();
        graph
    }

    #[test]
    fn test_save_and_load_graph() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");

        let original = create_test_graph();
        save_graph(&original, &path, None).unwrap();
        let loaded = load_graph(&path).unwrap();

        assert_eq!(loaded.node_count(), 3);
        assert_eq!(loaded.edges(), original.edges());
        let a = loaded.node_index("A").unwrap();
        let b = loaded.node_index("B").unwrap();
        assert!(loaded.is_directed_from_to(a, b));
        let l = loaded.node_index("L").unwrap();
        assert_eq!(loaded.node(l).unwrap().node_type, NodeType::Latent);
        assert_eq!(loaded.edge_kind(b, l), Some(EdgeKind::Bidirected));
    }

    #[test]
    fn test_save_with_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");

        let metadata = GraphMetadata::described("pc depth=2");
        save_graph(&create_test_graph(), &path, Some(metadata)).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("pc depth=2"));
    }

    #[test]
    fn test_load_graph_from_str_minimal() {
        let json = r#"{
            "nodes": [{"name": "X"}, {"name": "Y"}],
            "edges": [{"node1": "X", "node2": "Y", "endpoint1": "tail", "endpoint2": "tail"}]
        }"#;

        let graph = load_graph_from_str(json).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges(), vec![Edge::undirected("X", "Y")]);
    }

    #[test]
    fn test_edges_with_missing_nodes_are_skipped() {
        let json = r#"{
            "nodes": [{"name": "A"}],
            "edges": [{"node1": "A", "node2": "missing", "endpoint1": "tail", "endpoint2": "arrow"}]
        }"#;

        let graph = load_graph_from_str(json).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_node_names_rejected() {
        let json = r#"{"nodes": [{"name": "A"}, {"name": "A"}], "edges": []}"#;
        assert!(load_graph_from_str(json).is_err());
    }

    #[test]
    fn test_load_graph_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        std::fs::write(&path, "not valid json").unwrap();

        assert!(matches!(load_graph(&path), Err(Error::Parse(_))));
    }

    #[test]
    fn test_load_graph_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_graph(dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::IoPath { .. })));
    }

    #[test]
    fn test_metadata_default() {
        let meta = GraphMetadata::default();
        assert!(!meta.built_at.is_empty());
        assert!(!meta.builder_version.is_empty());
        assert!(meta.description.is_none());
    }
}
