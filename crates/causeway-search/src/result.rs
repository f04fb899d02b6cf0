//! Search result persistence.
//!
//! A [`SearchResult`] is written as one JSON document holding the graph in
//! the `causeway-graph` persistence format, the sepsets, the classified
//! triples and the counters.

use crate::search::{SearchConfig, SearchResult, SearchStats};
use crate::sepset::SepsetMap;
use causeway_core::{Error, Result};
use causeway_graph::{GraphMetadata, SerializableGraph, Triple};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk form of a search result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredSearchResult {
    /// The output graph.
    pub graph: SerializableGraph,
    /// Recorded separating sets.
    #[serde(default)]
    pub sepsets: SepsetMap,
    /// Collider triples, sorted.
    #[serde(default)]
    pub collider_triples: Vec<Triple>,
    /// Noncollider triples, sorted.
    #[serde(default)]
    pub noncollider_triples: Vec<Triple>,
    /// Ambiguous triples, sorted.
    #[serde(default)]
    pub ambiguous_triples: Vec<Triple>,
    /// Whether the search ran to the end.
    pub complete: bool,
    /// Counters.
    #[serde(default)]
    pub stats: SearchStats,
    /// Settings the search ran with, when known.
    #[serde(default)]
    pub config: Option<SearchConfig>,
}

impl StoredSearchResult {
    /// Snapshot a result.
    pub fn from_result(
        result: &SearchResult,
        config: Option<&SearchConfig>,
        metadata: Option<GraphMetadata>,
    ) -> Self {
        Self {
            graph: SerializableGraph::from_graph(&result.graph, metadata),
            sepsets: result.sepsets.clone(),
            collider_triples: result.collider_triples.iter().cloned().collect(),
            noncollider_triples: result.noncollider_triples.iter().cloned().collect(),
            ambiguous_triples: result.ambiguous_triples.iter().cloned().collect(),
            complete: result.complete,
            stats: result.stats.clone(),
            config: config.cloned(),
        }
    }

    /// Rebuild the in-memory result.
    pub fn into_result(self) -> Result<SearchResult> {
        Ok(SearchResult {
            graph: self.graph.into_graph()?,
            sepsets: self.sepsets,
            collider_triples: self.collider_triples.into_iter().collect(),
            noncollider_triples: self.noncollider_triples.into_iter().collect(),
            ambiguous_triples: self.ambiguous_triples.into_iter().collect(),
            complete: self.complete,
            stats: self.stats,
        })
    }
}

/// Serialize a result to pretty JSON.
pub fn result_to_string(result: &SearchResult, config: Option<&SearchConfig>) -> Result<String> {
    let description = config.map(|c| format!("{} search", c.collider_strategy));
    let metadata = GraphMetadata {
        description,
        ..GraphMetadata::default()
    };
    let stored = StoredSearchResult::from_result(result, config, Some(metadata));
    Ok(serde_json::to_string_pretty(&stored)?)
}

/// Save a result to a JSON file.
pub fn save_result(
    result: &SearchResult,
    config: Option<&SearchConfig>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let json = result_to_string(result, config)?;
    std::fs::write(path.as_ref(), json).map_err(|e| Error::io_with_path(e, path.as_ref()))?;
    log::debug!("Saved search result to {}", path.as_ref().display());
    Ok(())
}

/// Load a result from a JSON file.
pub fn load_result(path: impl AsRef<Path>) -> Result<StoredSearchResult> {
    let json = std::fs::read_to_string(path.as_ref())
        .map_err(|e| Error::io_with_path(e, path.as_ref()))?;
    serde_json::from_str(&json)
        .map_err(|e| Error::parse(format!("Failed to parse search result JSON: {e}")))
}
