//! Causeway Core: shared error types and cancellation.
//!
//! This crate provides the foundational types used across all Causeway
//! crates. It has no internal Causeway dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`cancel`]: Cooperative cancellation flag polled by search loops

#![doc = include_str!("../README.md")]

pub mod cancel;
pub mod error;

// Re-export key types at crate root for convenience
pub use cancel::CancellationFlag;
pub use error::{Error, Result};
