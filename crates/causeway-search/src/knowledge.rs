//! Background knowledge.
//!
//! [`Knowledge`] records which directed edges are forbidden or required,
//! which adjacencies are ruled out entirely, and an optional temporal
//! tier order (a later tier never causes an earlier one). It is built
//! once through [`KnowledgeBuilder`] and immutable afterwards.
//!
//! Knowledge can also be read from TOML:
//!
//! ```toml
//! forbidden = [["B", "A"]]
//! required = [["A", "B"]]
//! forbidden_adjacencies = [["A", "D"]]
//!
//! [[tiers]]
//! nodes = ["A", "C"]
//! forbid_within = false
//! ```

use causeway_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

// ============================================================================
// Types
// ============================================================================

/// A temporal tier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Variables in the tier.
    pub nodes: Vec<String>,
    /// Forbid edges between variables of this tier.
    #[serde(default)]
    pub forbid_within: bool,
}

/// Immutable background knowledge over variable names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Knowledge {
    forbidden: BTreeSet<(String, String)>,
    required: BTreeSet<(String, String)>,
    forbidden_adjacencies: BTreeSet<(String, String)>,
    tiers: Vec<Tier>,
    tier_of: HashMap<String, usize>,
}

fn unordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl Knowledge {
    /// Knowledge with no constraints.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building knowledge.
    pub fn builder() -> KnowledgeBuilder {
        KnowledgeBuilder::default()
    }

    /// Whether no constraint of any kind is present.
    pub fn is_empty(&self) -> bool {
        self.forbidden.is_empty()
            && self.required.is_empty()
            && self.forbidden_adjacencies.is_empty()
            && self.tiers.is_empty()
    }

    /// Whether `from --> to` is ruled out.
    ///
    /// An orientation is forbidden when listed explicitly, when the pair's
    /// adjacency is forbidden, when `from` sits in a later tier than `to`,
    /// or when both share a tier that forbids edges within it.
    pub fn is_forbidden(&self, from: &str, to: &str) -> bool {
        if self.forbidden.contains(&(from.to_string(), to.to_string()))
            || self.forbidden_adjacencies.contains(&unordered(from, to))
        {
            return true;
        }
        match (self.tier_of.get(from), self.tier_of.get(to)) {
            (Some(&tf), Some(&tt)) if tf > tt => true,
            (Some(&tf), Some(&tt)) if tf == tt => self.tiers[tf].forbid_within,
            _ => false,
        }
    }

    /// Whether `from --> to` is required.
    pub fn is_required(&self, from: &str, to: &str) -> bool {
        self.required.contains(&(from.to_string(), to.to_string()))
    }

    /// Whether some edge between `a` and `b` is required.
    pub fn is_adjacency_required(&self, a: &str, b: &str) -> bool {
        self.is_required(a, b) || self.is_required(b, a)
    }

    /// Whether no edge may join `a` and `b` in either direction.
    pub fn is_adjacency_forbidden(&self, a: &str, b: &str) -> bool {
        !self.is_adjacency_required(a, b) && self.is_forbidden(a, b) && self.is_forbidden(b, a)
    }

    /// Required edges as `(from, to)`, ordered.
    pub fn required_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.required.iter().map(|(f, t)| (f.as_str(), t.as_str()))
    }

    /// Explicitly forbidden edges as `(from, to)`, ordered.
    pub fn forbidden_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forbidden.iter().map(|(f, t)| (f.as_str(), t.as_str()))
    }

    /// Tiers in temporal order.
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Every variable name mentioned anywhere, ordered.
    pub fn variables(&self) -> BTreeSet<&str> {
        let pairs = self
            .forbidden
            .iter()
            .chain(&self.required)
            .chain(&self.forbidden_adjacencies)
            .flat_map(|(a, b)| [a.as_str(), b.as_str()]);
        let tiered = self.tier_of.keys().map(String::as_str);
        pairs.chain(tiered).collect()
    }

    /// Check that every mentioned variable is one of `names`.
    pub fn check_variables<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let known: BTreeSet<&str> = names.into_iter().collect();
        let unknown: Vec<&str> = self
            .variables()
            .into_iter()
            .filter(|v| !known.contains(v))
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(Error::config(format!(
                "knowledge names unknown variable(s): {}",
                unknown.join(", ")
            )))
        }
    }

    /// Parse knowledge from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: KnowledgeFile = toml::from_str(text)
            .map_err(|e| Error::parse(format!("Failed to parse knowledge TOML: {e}")))?;
        file.build()
    }

    /// The TOML file form of this knowledge.
    pub fn to_file(&self) -> KnowledgeFile {
        let to_vec = |set: &BTreeSet<(String, String)>| {
            set.iter()
                .map(|(a, b)| [a.clone(), b.clone()])
                .collect::<Vec<_>>()
        };
        KnowledgeFile {
            forbidden: to_vec(&self.forbidden),
            required: to_vec(&self.required),
            forbidden_adjacencies: to_vec(&self.forbidden_adjacencies),
            tiers: self.tiers.clone(),
        }
    }
}

/// Load knowledge from a TOML file.
pub fn load_knowledge(path: impl AsRef<Path>) -> Result<Knowledge> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| Error::io_with_path(e, path.as_ref()))?;
    Knowledge::from_toml_str(&text)
}

// ============================================================================
// File format
// ============================================================================

/// Serialized form of [`Knowledge`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeFile {
    /// Forbidden `[from, to]` edges.
    pub forbidden: Vec<[String; 2]>,
    /// Required `[from, to]` edges.
    pub required: Vec<[String; 2]>,
    /// Pairs that may not be adjacent at all.
    pub forbidden_adjacencies: Vec<[String; 2]>,
    /// Tiers in temporal order.
    pub tiers: Vec<Tier>,
}

impl KnowledgeFile {
    /// Validate and build.
    pub fn build(self) -> Result<Knowledge> {
        let mut builder = Knowledge::builder();
        for [from, to] in self.forbidden {
            builder = builder.forbid(from, to);
        }
        for [from, to] in self.required {
            builder = builder.require(from, to);
        }
        for [a, b] in self.forbidden_adjacencies {
            builder = builder.forbid_adjacency(a, b);
        }
        for tier in self.tiers {
            builder = builder.tier(tier);
        }
        builder.build()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Knowledge`]; contradictions are reported by [`build`].
///
/// [`build`]: KnowledgeBuilder::build
#[derive(Clone, Debug, Default)]
pub struct KnowledgeBuilder {
    forbidden: Vec<(String, String)>,
    required: Vec<(String, String)>,
    forbidden_adjacencies: Vec<(String, String)>,
    tiers: Vec<Tier>,
}

impl KnowledgeBuilder {
    /// Forbid `from --> to`.
    pub fn forbid(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.forbidden.push((from.into(), to.into()));
        self
    }

    /// Require `from --> to`.
    pub fn require(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.required.push((from.into(), to.into()));
        self
    }

    /// Forbid any edge between `a` and `b`.
    pub fn forbid_adjacency(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.forbidden_adjacencies.push((a.into(), b.into()));
        self
    }

    /// Append a tier after the existing ones.
    pub fn add_tier<S: Into<String>>(self, nodes: impl IntoIterator<Item = S>) -> Self {
        self.tier(Tier {
            nodes: nodes.into_iter().map(Into::into).collect(),
            forbid_within: false,
        })
    }

    /// Append a tier whose members may not be adjacent to each other.
    pub fn add_tier_forbidding_within<S: Into<String>>(
        self,
        nodes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.tier(Tier {
            nodes: nodes.into_iter().map(Into::into).collect(),
            forbid_within: true,
        })
    }

    fn tier(mut self, tier: Tier) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Validate and freeze.
    ///
    /// Fails when an edge names the same variable twice, a variable sits
    /// in two tiers, an edge is required in both directions, or a
    /// required edge is also forbidden by any rule.
    pub fn build(self) -> Result<Knowledge> {
        let self_edge = self
            .forbidden
            .iter()
            .chain(&self.required)
            .chain(&self.forbidden_adjacencies)
            .find(|(a, b)| a == b);
        if let Some((a, _)) = self_edge {
            return Err(Error::knowledge(format!("edge from '{a}' to itself")));
        }

        let mut tier_of = HashMap::new();
        for (i, tier) in self.tiers.iter().enumerate() {
            for node in &tier.nodes {
                if let Some(previous) = tier_of.insert(node.clone(), i) {
                    return Err(Error::knowledge(format!(
                        "'{node}' appears in tiers {previous} and {i}"
                    )));
                }
            }
        }

        let knowledge = Knowledge {
            forbidden: self.forbidden.into_iter().collect(),
            required: self.required.into_iter().collect(),
            forbidden_adjacencies: self
                .forbidden_adjacencies
                .iter()
                .map(|(a, b)| unordered(a, b))
                .collect(),
            tiers: self.tiers,
            tier_of,
        };

        for (from, to) in knowledge.required_edges() {
            if knowledge.is_required(to, from) {
                return Err(Error::knowledge(format!(
                    "{from} --> {to} is required in both directions"
                )));
            }
            if knowledge.is_forbidden(from, to) {
                return Err(Error::knowledge(format!(
                    "{from} --> {to} is both required and forbidden"
                )));
            }
        }

        log::debug!(
            "knowledge: {} forbidden, {} required, {} forbidden adjacencies, {} tiers",
            knowledge.forbidden.len(),
            knowledge.required.len(),
            knowledge.forbidden_adjacencies.len(),
            knowledge.tiers.len()
        );
        Ok(knowledge)
    }
}

// ============================================================================
// Tests
// ============================================================================
