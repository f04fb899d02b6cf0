//! Node triples used for collider diagnostics.

use crate::graph::Graph;
use causeway_core::Result;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A triple `(x, y, z)` of node names with `y` in the middle.
///
/// The ends are unordered: `(x, y, z)` and `(z, y, x)` are the same
/// triple. The constructor stores the lexically smaller end first so the
/// derived equality, hashing and ordering all respect that.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    x: String,
    y: String,
    z: String,
}

impl Triple {
    /// Create a triple with `y` in the middle.
    pub fn new(x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
        let (x, y, z) = (x.into(), y.into(), z.into());
        if x <= z {
            Self { x, y, z }
        } else {
            Self { x: z, y, z: x }
        }
    }

    /// Create a triple from node indices of `graph`.
    pub fn from_indices(graph: &Graph, x: NodeIndex, y: NodeIndex, z: NodeIndex) -> Result<Self> {
        Ok(Self::new(graph.name_of(x)?, graph.name_of(y)?, graph.name_of(z)?))
    }

    /// First end.
    pub fn x(&self) -> &str {
        &self.x
    }

    /// Middle node.
    pub fn y(&self) -> &str {
        &self.y
    }

    /// Second end.
    pub fn z(&self) -> &str {
        &self.z
    }

    /// Whether the triple is unshielded in `graph`.
    pub fn is_unshielded_in(&self, graph: &Graph) -> bool {
        let (Some(x), Some(y), Some(z)) = (
            graph.node_index(&self.x),
            graph.node_index(&self.y),
            graph.node_index(&self.z),
        ) else {
            return false;
        };
        graph.is_adjacent(x, y) && graph.is_adjacent(y, z) && !graph.is_adjacent(x, z)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}
