//! Separating-set bookkeeping.
//!
//! Keys are unordered pairs of node names. [`SepsetMap`] keeps the first
//! separating set found for each pair; [`SepsetsMinimal`] keeps every
//! set found.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn pair(x: &str, y: &str) -> (String, String) {
    if x <= y {
        (x.to_string(), y.to_string())
    } else {
        (y.to_string(), x.to_string())
    }
}

// ============================================================================
// SepsetMap
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
struct SepsetEntry {
    set: Vec<String>,
    statistic: f64,
}

/// One stored separating set, as written to JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SepsetRecord {
    /// Lexically smaller node of the pair.
    pub x: String,
    /// Lexically larger node of the pair.
    pub y: String,
    /// The separating set, in the order it was tested.
    pub set: Vec<String>,
    /// Statistic of the test that removed the edge.
    pub statistic: f64,
}

/// Write-once map from a node pair to the set that separated it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SepsetRecord>", into = "Vec<SepsetRecord>")]
pub struct SepsetMap {
    entries: BTreeMap<(String, String), SepsetEntry>,
}

impl SepsetMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the separating set for `x` and `y`.
    ///
    /// Returns `false`, leaving the map unchanged, when the pair already
    /// has a set.
    pub fn put(
        &mut self,
        x: &str,
        y: &str,
        set: impl IntoIterator<Item = impl Into<String>>,
        statistic: f64,
    ) -> bool {
        let key = pair(x, y);
        if self.entries.contains_key(&key) {
            log::debug!("sepset for {x} and {y} already recorded; ignoring");
            return false;
        }
        self.entries.insert(
            key,
            SepsetEntry {
                set: set.into_iter().map(Into::into).collect(),
                statistic,
            },
        );
        true
    }

    /// The separating set for `x` and `y`, if one was recorded.
    pub fn get(&self, x: &str, y: &str) -> Option<&[String]> {
        self.entries.get(&pair(x, y)).map(|e| e.set.as_slice())
    }

    /// The statistic recorded with the separating set for `x` and `y`.
    pub fn statistic(&self, x: &str, y: &str) -> Option<f64> {
        self.entries.get(&pair(x, y)).map(|e| e.statistic)
    }

    /// Whether `node` is in the recorded separating set for `x` and `y`.
    ///
    /// `false` when no set was recorded.
    pub fn is_in_sepset(&self, node: &str, x: &str, y: &str) -> bool {
        self.get(x, y).is_some_and(|set| set.iter().any(|n| n == node))
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by pair.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.entries
            .iter()
            .map(|((x, y), e)| (x.as_str(), y.as_str(), e.set.as_slice()))
    }
}

impl From<Vec<SepsetRecord>> for SepsetMap {
    fn from(records: Vec<SepsetRecord>) -> Self {
        let mut map = Self::new();
        for r in records {
            map.put(&r.x, &r.y, r.set, r.statistic);
        }
        map
    }
}

impl From<SepsetMap> for Vec<SepsetRecord> {
    fn from(map: SepsetMap) -> Self {
        map.entries
            .into_iter()
            .map(|((x, y), e)| SepsetRecord {
                x,
                y,
                set: e.set,
                statistic: e.statistic,
            })
            .collect()
    }
}

// ============================================================================
// SepsetsMinimal
// ============================================================================

/// Every separating set found for each pair, reduced to the minimal ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SepsetsMinimal {
    entries: BTreeMap<(String, String), Vec<Vec<String>>>,
}

impl SepsetsMinimal {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a separating set for `x` and `y`.
    ///
    /// Sets that contain an already-stored set are dropped; stored sets
    /// that contain the new one are replaced by it. Returns whether the
    /// set was kept.
    pub fn add(&mut self, x: &str, y: &str, set: Vec<String>) -> bool {
        let sets = self.entries.entry(pair(x, y)).or_default();
        if sets.iter().any(|s| is_subset(s, &set)) {
            return false;
        }
        sets.retain(|s| !is_subset(&set, s));
        sets.push(set);
        true
    }

    /// Minimal separating sets found for `x` and `y`.
    pub fn get(&self, x: &str, y: &str) -> &[Vec<String>] {
        self.entries
            .get(&pair(x, y))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of pairs with at least one set.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|s| !s.is_empty()).count()
    }

    /// Whether no set has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_subset(small: &[String], large: &[String]) -> bool {
    small.iter().all(|n| large.contains(n))
}

// ============================================================================
// Tests
// ============================================================================
