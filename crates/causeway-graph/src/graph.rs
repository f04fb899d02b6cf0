//! The mutable endpoint-labelled graph used by every search phase.
//!
//! Storage is a petgraph `StableUnGraph` so node indices never shift when
//! edges are removed. A normalised node-pair index gives O(1) adjacency
//! and endpoint lookups. Node iteration follows insertion order, which is
//! the stable ordering all searches enumerate over.

use crate::types::{Edge, EdgeKind, Endpoint, Node, NodeEquality};
use causeway_core::{Error, Result};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use std::collections::HashMap;
use std::fmt;

/// Endpoint marks of a stored edge, keyed by the lower/higher node index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Marks {
    at_low: Endpoint,
    at_high: Endpoint,
}

/// A graph of named nodes joined by endpoint-labelled edges.
///
/// At most one edge joins any pair of nodes and self-loops are rejected.
/// Mutation fires no notifications; callers re-query after changes.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    graph: StableUnGraph<Node, Marks>,
    node_indices: HashMap<String, NodeIndex>,
    edge_lookup: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
    equality: NodeEquality,
}

fn pair_key(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Graph {
    /// Create an empty graph with name-based node equality.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with an explicit node equality mode.
    pub fn with_equality(equality: NodeEquality) -> Self {
        Self {
            equality,
            ..Self::default()
        }
    }

    /// Create an edgeless graph over the given nodes.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node)?;
        }
        Ok(graph)
    }

    /// The node equality mode fixed at construction.
    pub fn equality(&self) -> NodeEquality {
        self.equality
    }

    // ------------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------------

    /// Add a node. Names must be unique within the graph.
    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex> {
        if self.node_indices.contains_key(&node.name) {
            return Err(Error::graph(format!("duplicate node name '{}'", node.name)));
        }
        let name = node.name.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(name, idx);
        Ok(idx)
    }

    /// Look up a node index by name.
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    /// Look up a node index by name, failing with `NotFound`.
    pub fn index_of(&self, name: &str) -> Result<NodeIndex> {
        self.node_index(name)
            .ok_or_else(|| Error::not_found(format!("node '{name}'")))
    }

    /// Find the graph's own copy of an external node under the equality mode.
    pub fn resolve(&self, node: &Node) -> Option<NodeIndex> {
        let idx = self.node_index(&node.name)?;
        match self.equality {
            NodeEquality::Name => Some(idx),
            NodeEquality::Identity => (self.graph[idx].id == node.id).then_some(idx),
        }
    }

    /// Whether a node with this name exists.
    pub fn contains_node(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// The node at `idx`, if present.
    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(idx)
    }

    /// Name of the node at `idx`, if present.
    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(|node| node.name.as_str())
    }

    /// Name of the node at `idx`, failing with `NotFound`.
    pub fn name_of(&self, idx: NodeIndex) -> Result<&str> {
        self.name(idx)
            .ok_or_else(|| Error::not_found(format!("node index {}", idx.index())))
    }

    /// Name for messages; `?` for an index outside the graph.
    fn label(&self, idx: NodeIndex) -> &str {
        self.name(idx).unwrap_or("?")
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().collect()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    // ------------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------------

    /// Add an edge with mark `at_a` at `a` and `at_b` at `b`.
    ///
    /// Rejects self-loops, unknown nodes and a second edge between the
    /// same pair.
    pub fn add_edge(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        at_a: Endpoint,
        at_b: Endpoint,
    ) -> Result<()> {
        if self.node(a).is_none() || self.node(b).is_none() {
            return Err(Error::graph("edge references a node not in the graph"));
        }
        if a == b {
            return Err(Error::graph(format!("self-loop on '{}'", self.label(a))));
        }
        let key = pair_key(a, b);
        if self.edge_lookup.contains_key(&key) {
            return Err(Error::graph(format!(
                "'{}' and '{}' are already adjacent",
                self.label(a),
                self.label(b)
            )));
        }
        let marks = if a < b {
            Marks {
                at_low: at_a,
                at_high: at_b,
            }
        } else {
            Marks {
                at_low: at_b,
                at_high: at_a,
            }
        };
        let edge = self.graph.add_edge(key.0, key.1, marks);
        self.edge_lookup.insert(key, edge);
        Ok(())
    }

    /// Add `from --> to`.
    pub fn add_directed_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Result<()> {
        self.add_edge(from, to, Endpoint::Tail, Endpoint::Arrow)
    }

    /// Add `a --- b`.
    pub fn add_undirected_edge(&mut self, a: NodeIndex, b: NodeIndex) -> Result<()> {
        self.add_edge(a, b, Endpoint::Tail, Endpoint::Tail)
    }

    /// Add `a <-> b`.
    pub fn add_bidirected_edge(&mut self, a: NodeIndex, b: NodeIndex) -> Result<()> {
        self.add_edge(a, b, Endpoint::Arrow, Endpoint::Arrow)
    }

    /// Add `a o-o b`.
    pub fn add_nondirected_edge(&mut self, a: NodeIndex, b: NodeIndex) -> Result<()> {
        self.add_edge(a, b, Endpoint::Circle, Endpoint::Circle)
    }

    /// Add a named edge; both nodes must already exist.
    pub fn add_named_edge(&mut self, edge: &Edge) -> Result<()> {
        let a = self.index_of(&edge.node1)?;
        let b = self.index_of(&edge.node2)?;
        self.add_edge(a, b, edge.endpoint1, edge.endpoint2)
    }

    /// Remove the edge between `a` and `b`. Returns whether one existed.
    pub fn remove_edge(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        match self.edge_lookup.remove(&pair_key(a, b)) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    /// Remove every edge, keeping the nodes.
    pub fn clear_edges(&mut self) {
        self.graph.clear_edges();
        self.edge_lookup.clear();
    }

    /// Whether `a` and `b` are joined by an edge.
    pub fn is_adjacent(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.edge_lookup.contains_key(&pair_key(a, b))
    }

    fn marks(&self, a: NodeIndex, b: NodeIndex) -> Option<Marks> {
        let edge = self.edge_lookup.get(&pair_key(a, b))?;
        self.graph.edge_weight(*edge).copied()
    }

    /// The mark at `b` on the edge `a`–`b`.
    pub fn endpoint(&self, a: NodeIndex, b: NodeIndex) -> Option<Endpoint> {
        let marks = self.marks(a, b)?;
        Some(if b > a { marks.at_high } else { marks.at_low })
    }

    /// Set the mark at `b` on the existing edge `a`–`b`.
    pub fn set_endpoint(&mut self, a: NodeIndex, b: NodeIndex, endpoint: Endpoint) -> Result<()> {
        let edge = self.edge_lookup.get(&pair_key(a, b)).copied().ok_or_else(|| {
            Error::graph(format!(
                "no edge between '{}' and '{}'",
                self.label(a),
                self.label(b)
            ))
        })?;
        if let Some(marks) = self.graph.edge_weight_mut(edge) {
            if b > a {
                marks.at_high = endpoint;
            } else {
                marks.at_low = endpoint;
            }
        }
        Ok(())
    }

    /// Set both marks on the existing edge `a`–`b`.
    pub fn set_edge(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        at_a: Endpoint,
        at_b: Endpoint,
    ) -> Result<()> {
        self.set_endpoint(b, a, at_a)?;
        self.set_endpoint(a, b, at_b)
    }

    /// The edge `a`–`b` written from `a`'s side.
    pub fn edge(&self, a: NodeIndex, b: NodeIndex) -> Option<Edge> {
        let at_b = self.endpoint(a, b)?;
        let at_a = self.endpoint(b, a)?;
        Some(Edge::new(self.name(a)?, self.name(b)?, at_a, at_b))
    }

    /// Derived kind of the edge `a`–`b`.
    pub fn edge_kind(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeKind> {
        let marks = self.marks(a, b)?;
        Some(EdgeKind::classify(marks.at_low, marks.at_high))
    }

    /// All edges in canonical form, sorted by node names.
    ///
    /// The listing depends only on names and marks, so two graphs built
    /// with different insertion orders list identical edges identically.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .edge_lookup
            .keys()
            .filter_map(|&(a, b)| self.edge(a, b))
            .map(Edge::canonical)
            .collect();
        edges.sort();
        edges
    }

    /// Index pairs `(a, b)` with `a < b` for every edge, sorted.
    pub fn edge_pairs(&self) -> Vec<(NodeIndex, NodeIndex)> {
        let mut pairs: Vec<_> = self.edge_lookup.keys().copied().collect();
        pairs.sort();
        pairs
    }

    // ------------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------------

    /// Nodes adjacent to `a`, sorted by index.
    pub fn adjacent_nodes(&self, a: NodeIndex) -> Vec<NodeIndex> {
        let mut adj: Vec<NodeIndex> = self.graph.neighbors(a).collect();
        adj.sort();
        adj.dedup();
        adj
    }

    /// Number of edges incident to `a`.
    pub fn degree(&self, a: NodeIndex) -> usize {
        self.graph.neighbors(a).count()
    }

    /// Whether the edge is exactly `a --> b`.
    pub fn is_directed_from_to(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.endpoint(b, a) == Some(Endpoint::Tail) && self.endpoint(a, b) == Some(Endpoint::Arrow)
    }

    /// Whether the edge is exactly `a --- b`.
    pub fn is_undirected(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.edge_kind(a, b) == Some(EdgeKind::Undirected)
    }

    /// Whether the edge is exactly `a <-> b`.
    pub fn is_bidirected(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.edge_kind(a, b) == Some(EdgeKind::Bidirected)
    }

    /// Whether the edge `a`–`b` carries an arrowhead at `b`.
    pub fn has_arrowhead_at(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.endpoint(a, b) == Some(Endpoint::Arrow)
    }

    /// Nodes `p` with `p --> a`, sorted by index.
    pub fn parents(&self, a: NodeIndex) -> Vec<NodeIndex> {
        self.adjacent_nodes(a)
            .into_iter()
            .filter(|&p| self.is_directed_from_to(p, a))
            .collect()
    }

    /// Nodes `c` with `a --> c`, sorted by index.
    pub fn children(&self, a: NodeIndex) -> Vec<NodeIndex> {
        self.adjacent_nodes(a)
            .into_iter()
            .filter(|&c| self.is_directed_from_to(a, c))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Bulk operations
    // ------------------------------------------------------------------------

    /// Join every pair of nodes, using `endpoint` on both sides.
    ///
    /// Existing edges are replaced.
    pub fn fully_connect(&mut self, endpoint: Endpoint) {
        self.clear_edges();
        let nodes = self.node_indices();
        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                let edge = self.graph.add_edge(
                    a,
                    b,
                    Marks {
                        at_low: endpoint,
                        at_high: endpoint,
                    },
                );
                self.edge_lookup.insert(pair_key(a, b), edge);
            }
        }
    }

    /// Set every mark on every edge to `endpoint`.
    pub fn reorient_all_with(&mut self, endpoint: Endpoint) {
        let edges: Vec<EdgeIndex> = self.edge_lookup.values().copied().collect();
        for edge in edges {
            if let Some(marks) = self.graph.edge_weight_mut(edge) {
                marks.at_low = endpoint;
                marks.at_high = endpoint;
            }
        }
    }

    /// Unshielded triples `(x, y, z)`: x–y and y–z adjacent, x and z not.
    ///
    /// Ordered by middle node, then by `(x, z)` with `x < z`, so each
    /// triple appears once.
    pub fn unshielded_triples(&self) -> Vec<(NodeIndex, NodeIndex, NodeIndex)> {
        let mut triples = Vec::new();
        for y in self.graph.node_indices() {
            let adj = self.adjacent_nodes(y);
            for (i, &x) in adj.iter().enumerate() {
                for &z in &adj[i + 1..] {
                    if !self.is_adjacent(x, z) {
                        triples.push((x, y, z));
                    }
                }
            }
        }
        triples
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph Nodes:")?;
        let names: Vec<&str> = self.nodes().map(|n| n.name.as_str()).collect();
        writeln!(f, "{}", names.join(";"))?;
        writeln!(f)?;
        writeln!(f, "Graph Edges:")?;
        for (i, edge) in self.edges().iter().enumerate() {
            writeln!(f, "{}. {edge}", i + 1)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
