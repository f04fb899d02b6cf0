//! Core node and edge types for causal graphs.
//!
//! Edges carry one [`Endpoint`] per incident node. The kind of an edge
//! (directed, bidirected, ...) is derived from its endpoints and never
//! stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Nodes
// ============================================================================

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity.
///
/// Allocated when a [`Node`] is constructed; clones share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh identity.
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Kind of variable a node represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// An observed variable.
    #[default]
    Measured,
    /// An unobserved (latent) variable.
    Latent,
    /// An error term.
    Error,
}

/// A variable in a causal graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Identity, regenerated when a node is deserialized.
    #[serde(skip, default = "NodeId::next")]
    pub id: NodeId,
    /// Name, unique within a graph.
    pub name: String,
    /// Variable kind.
    #[serde(default)]
    pub node_type: NodeType,
}

impl Node {
    /// Create a measured node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            name: name.into(),
            node_type: NodeType::Measured,
        }
    }

    /// Create a latent node.
    pub fn latent(name: impl Into<String>) -> Self {
        Self::new(name).with_type(NodeType::Latent)
    }

    /// Set the node type.
    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    /// Whether two nodes are the same under the given equality mode.
    pub fn same_as(&self, other: &Node, equality: NodeEquality) -> bool {
        match equality {
            NodeEquality::Identity => self.id == other.id,
            NodeEquality::Name => self.name == other.name,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How a graph decides whether an external [`Node`] is one of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeEquality {
    /// Nodes match only when they share a [`NodeId`].
    Identity,
    /// Nodes match when their names are equal.
    #[default]
    Name,
}

// ============================================================================
// Endpoints and edges
// ============================================================================

/// Mark at one end of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// No arrowhead.
    Tail,
    /// Arrowhead.
    Arrow,
    /// Undetermined mark.
    Circle,
}

/// Derived classification of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// `-->`
    Directed,
    /// `<->`
    Bidirected,
    /// `---`
    Undirected,
    /// `o->`
    PartiallyOriented,
    /// `o-o`
    Nondirected,
    /// Any remaining combination (`o--`).
    Other,
}

impl EdgeKind {
    /// Classify a pair of endpoints (order does not matter).
    pub fn classify(a: Endpoint, b: Endpoint) -> Self {
        use Endpoint::*;
        match (a, b) {
            (Tail, Arrow) | (Arrow, Tail) => Self::Directed,
            (Arrow, Arrow) => Self::Bidirected,
            (Tail, Tail) => Self::Undirected,
            (Circle, Arrow) | (Arrow, Circle) => Self::PartiallyOriented,
            (Circle, Circle) => Self::Nondirected,
            _ => Self::Other,
        }
    }

    /// Snake-case name, used for statistics keys.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Directed => "directed",
            Self::Bidirected => "bidirected",
            Self::Undirected => "undirected",
            Self::PartiallyOriented => "partially_oriented",
            Self::Nondirected => "nondirected",
            Self::Other => "other",
        }
    }
}

/// A named edge, detached from any graph.
///
/// `endpoint1` is the mark at `node1`, `endpoint2` the mark at `node2`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    /// First node name.
    pub node1: String,
    /// Second node name.
    pub node2: String,
    /// Mark at `node1`.
    pub endpoint1: Endpoint,
    /// Mark at `node2`.
    pub endpoint2: Endpoint,
}

impl Edge {
    /// Create an edge with explicit endpoints.
    pub fn new(
        node1: impl Into<String>,
        node2: impl Into<String>,
        endpoint1: Endpoint,
        endpoint2: Endpoint,
    ) -> Self {
        Self {
            node1: node1.into(),
            node2: node2.into(),
            endpoint1,
            endpoint2,
        }
    }

    /// `from --> to`
    pub fn directed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, Endpoint::Tail, Endpoint::Arrow)
    }

    /// `a --- b`
    pub fn undirected(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(a, b, Endpoint::Tail, Endpoint::Tail)
    }

    /// `a <-> b`
    pub fn bidirected(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(a, b, Endpoint::Arrow, Endpoint::Arrow)
    }

    /// `a o-o b`
    pub fn nondirected(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new(a, b, Endpoint::Circle, Endpoint::Circle)
    }

    /// `from o-> to`
    pub fn partially_oriented(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(from, to, Endpoint::Circle, Endpoint::Arrow)
    }

    /// Derived kind of this edge.
    pub fn kind(&self) -> EdgeKind {
        EdgeKind::classify(self.endpoint1, self.endpoint2)
    }

    /// Whether this is a directed edge.
    pub fn is_directed(&self) -> bool {
        self.kind() == EdgeKind::Directed
    }

    /// Mark at the named node, if it is incident to this edge.
    pub fn endpoint_at(&self, name: &str) -> Option<Endpoint> {
        if self.node1 == name {
            Some(self.endpoint1)
        } else if self.node2 == name {
            Some(self.endpoint2)
        } else {
            None
        }
    }

    /// The node at the other end from `name`.
    pub fn other(&self, name: &str) -> Option<&str> {
        if self.node1 == name {
            Some(&self.node2)
        } else if self.node2 == name {
            Some(&self.node1)
        } else {
            None
        }
    }

    /// The same edge written from the other side.
    pub fn reversed(&self) -> Self {
        Self::new(&self.node2, &self.node1, self.endpoint2, self.endpoint1)
    }

    /// Write the edge so that `node1` is the lexically smaller name.
    pub fn canonical(self) -> Self {
        if self.node1 <= self.node2 {
            self
        } else {
            self.reversed()
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = match self.endpoint1 {
            Endpoint::Tail => '-',
            Endpoint::Arrow => '<',
            Endpoint::Circle => 'o',
        };
        let right = match self.endpoint2 {
            Endpoint::Tail => '-',
            Endpoint::Arrow => '>',
            Endpoint::Circle => 'o',
        };
        write!(f, "{} {left}-{right} {}", self.node1, self.node2)
    }
}

// ============================================================================
// Tests
// ============================================================================
