//! Error types for Causeway operations.
//!
//! This module provides the common `Error` type and `Result<T>` alias used
//! across all Causeway crates. Uses `thiserror` for derive macros.
//!
//! The variants follow the search error taxonomy: configuration problems
//! are reported before a search starts, oracle failures abort the search,
//! and structural contradictions are reported with a diagnostic instead of
//! being repaired. Cooperative cancellation is not an error.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in Causeway operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    IoPath {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Configuration error (invalid depth, unknown variables, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Contradictory background knowledge.
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Invalid graph mutation.
    #[error("Graph error: {0}")]
    Graph(String),

    /// The independence oracle failed or returned an unusable verdict.
    #[error("Oracle failure testing {x} _||_ {y}: {message}")]
    Oracle {
        /// First variable of the failed test.
        x: String,
        /// Second variable of the failed test.
        y: String,
        /// Description of the failure.
        message: String,
    },

    /// The graph contradicts itself before orientation (e.g. a directed cycle).
    #[error("Structural contradiction: {0}")]
    StructuralContradiction(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Parse error for external input.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a knowledge error.
    pub fn knowledge(msg: impl Into<String>) -> Self {
        Self::Knowledge(msg.into())
    }

    /// Create a graph error.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }

    /// Create an oracle error for the test of `x` and `y`.
    pub fn oracle(x: impl Into<String>, y: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Oracle {
            x: x.into(),
            y: y.into(),
            message: msg.into(),
        }
    }

    /// Create a structural contradiction error.
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::StructuralContradiction(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Wrap an I/O error with the path that produced it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error was raised before any oracle call was made.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Knowledge(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using Causeway's Error type.
pub type Result<T> = std::result::Result<T, Error>;
