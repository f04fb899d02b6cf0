//! Configuration for the Causeway CLI.
//!
//! Provides the [`CausewayConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `CAUSEWAY_CONFIG` environment variable
//! 3. XDG default: `~/.config/causeway/config.toml`
//! 4. Built-in defaults
//!
//! `CAUSEWAY_*` environment variables are overlaid on top of the file.

use causeway_core::{Error, Result};
use causeway_search::SearchConfig;
use confyg::{Confygery, env};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CausewayConfig {
    /// Search settings used when the command line does not override them.
    pub search: SearchConfig,

    /// Where results go.
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default file for search results; results are printed when unset.
    pub result_path: Option<String>,

    /// Default background knowledge file.
    pub knowledge_path: Option<String>,
}

// ============================================================================
// Config loading
// ============================================================================

impl CausewayConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level("CAUSEWAY");
        env_opts.add_section("search");
        env_opts.add_section("output");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        config.search.validate()?;
        log::debug!("loaded configuration: {config:?}");
        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("CAUSEWAY_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("causeway").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Every key as a `CAUSEWAY_*` environment variable. Unset output
    /// paths are left out.
    pub fn to_env_vars(&self) -> Vec<(String, String)> {
        ConfigKey::ALL
            .iter()
            .filter_map(|key| key.get(self).map(|value| (key.env_var(), value)))
            .collect()
    }
}

// ============================================================================
// Config keys
// ============================================================================

/// A dotted key addressing one setting, e.g. `search.depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigKey {
    /// `search.depth`
    Depth,
    /// `search.stable`
    Stable,
    /// `search.collider_strategy`
    ColliderStrategy,
    /// `search.conflict_policy`
    ConflictPolicy,
    /// `search.prevent_cycles`
    PreventCycles,
    /// `search.max_path_length`
    MaxPathLength,
    /// `search.use_max_p_heuristic`
    UseMaxPHeuristic,
    /// `search.max_meek_passes`
    MaxMeekPasses,
    /// `search.revert_to_unshielded_colliders`
    RevertToUnshieldedColliders,
    /// `output.result_path`
    ResultPath,
    /// `output.knowledge_path`
    KnowledgePath,
}

impl ConfigKey {
    /// All keys in file order.
    pub const ALL: [ConfigKey; 11] = [
        Self::Depth,
        Self::Stable,
        Self::ColliderStrategy,
        Self::ConflictPolicy,
        Self::PreventCycles,
        Self::MaxPathLength,
        Self::UseMaxPHeuristic,
        Self::MaxMeekPasses,
        Self::RevertToUnshieldedColliders,
        Self::ResultPath,
        Self::KnowledgePath,
    ];

    /// The dotted key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Depth => "search.depth",
            Self::Stable => "search.stable",
            Self::ColliderStrategy => "search.collider_strategy",
            Self::ConflictPolicy => "search.conflict_policy",
            Self::PreventCycles => "search.prevent_cycles",
            Self::MaxPathLength => "search.max_path_length",
            Self::UseMaxPHeuristic => "search.use_max_p_heuristic",
            Self::MaxMeekPasses => "search.max_meek_passes",
            Self::RevertToUnshieldedColliders => "search.revert_to_unshielded_colliders",
            Self::ResultPath => "output.result_path",
            Self::KnowledgePath => "output.knowledge_path",
        }
    }

    /// The environment variable overriding this key.
    pub fn env_var(&self) -> String {
        format!("CAUSEWAY_{}", self.name().replace('.', "_").to_uppercase())
    }

    /// Current value as text; `None` for an unset output path.
    pub fn get(&self, config: &CausewayConfig) -> Option<String> {
        let search = &config.search;
        let value = match self {
            Self::Depth => search.depth.to_string(),
            Self::Stable => search.stable.to_string(),
            Self::ColliderStrategy => search.collider_strategy.to_string(),
            Self::ConflictPolicy => search.conflict_policy.to_string(),
            Self::PreventCycles => search.prevent_cycles.to_string(),
            Self::MaxPathLength => search.max_path_length.to_string(),
            Self::UseMaxPHeuristic => search.use_max_p_heuristic.to_string(),
            Self::MaxMeekPasses => search.max_meek_passes.to_string(),
            Self::RevertToUnshieldedColliders => search.revert_to_unshielded_colliders.to_string(),
            Self::ResultPath => return config.output.result_path.clone(),
            Self::KnowledgePath => return config.output.knowledge_path.clone(),
        };
        Some(value)
    }

    /// Parse `value` into the field behind this key. An empty value clears
    /// an output path. Range checks are left to [`SearchConfig::validate`].
    pub fn set(&self, config: &mut CausewayConfig, value: &str) -> Result<()> {
        let search = &mut config.search;
        match self {
            Self::Depth => search.depth = self.parse(value)?,
            Self::Stable => search.stable = self.parse(value)?,
            Self::ColliderStrategy => search.collider_strategy = value.parse()?,
            Self::ConflictPolicy => search.conflict_policy = value.parse()?,
            Self::PreventCycles => search.prevent_cycles = self.parse(value)?,
            Self::MaxPathLength => search.max_path_length = self.parse(value)?,
            Self::UseMaxPHeuristic => search.use_max_p_heuristic = self.parse(value)?,
            Self::MaxMeekPasses => search.max_meek_passes = self.parse(value)?,
            Self::RevertToUnshieldedColliders => {
                search.revert_to_unshielded_colliders = self.parse(value)?
            }
            Self::ResultPath => config.output.result_path = optional_path(value),
            Self::KnowledgePath => config.output.knowledge_path = optional_path(value),
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T>
    where
        T::Err: fmt::Display,
    {
        value
            .trim()
            .parse()
            .map_err(|e| Error::config(format!("invalid value '{value}' for {self}: {e}")))
    }
}

fn optional_path(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                Error::config(format!("unknown key '{s}'; expected one of: {}", known.join(", ")))
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
