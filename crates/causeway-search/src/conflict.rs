//! Conflict resolution between orientation decisions.
//!
//! A policy decides what happens when a collider wants an arrowhead into
//! `y` on an edge `x`–`y` whose marks were already set by an earlier,
//! independent decision.

use causeway_graph::Endpoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marks on an edge `x`–`y`: `at_x` at `x`, `at_y` at `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EndpointPair {
    /// Mark at the tail side of the proposal.
    pub at_x: Endpoint,
    /// Mark at the side the proposal points into.
    pub at_y: Endpoint,
}

impl EndpointPair {
    /// Create a pair.
    pub fn new(at_x: Endpoint, at_y: Endpoint) -> Self {
        Self { at_x, at_y }
    }

    /// `x --> y`
    pub fn directed() -> Self {
        Self::new(Endpoint::Tail, Endpoint::Arrow)
    }
}

/// How conflicting collider orientations are settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Keep an arrowhead already placed at `x`; otherwise orient `x --> y`.
    #[default]
    PrioritizeExisting,
    /// Put an arrowhead at `y` and keep whatever is at `x`, which yields
    /// `x <-> y` when the edge already pointed into `x`.
    OrientBidirected,
    /// Orient `x --> y` regardless of the current marks.
    OverwriteExisting,
}

impl ConflictPolicy {
    /// Marks the edge should carry after the proposal "arrow into `y`",
    /// or `None` when the proposal is refused.
    pub fn resolve(self, current: EndpointPair) -> Option<EndpointPair> {
        match self {
            Self::PrioritizeExisting => {
                (current.at_x != Endpoint::Arrow).then(EndpointPair::directed)
            }
            Self::OrientBidirected => Some(EndpointPair::new(current.at_x, Endpoint::Arrow)),
            Self::OverwriteExisting => Some(EndpointPair::directed()),
        }
    }

    /// Configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PrioritizeExisting => "prioritize_existing",
            Self::OrientBidirected => "orient_bidirected",
            Self::OverwriteExisting => "overwrite_existing",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConflictPolicy {
    type Err = causeway_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "prioritize_existing" => Ok(Self::PrioritizeExisting),
            "orient_bidirected" => Ok(Self::OrientBidirected),
            "overwrite_existing" => Ok(Self::OverwriteExisting),
            other => Err(causeway_core::Error::config(format!(
                "unknown conflict policy '{other}'"
            ))),
        }
    }
}
