//! Command-line front end for Causeway.
//!
//! # Key Abstractions
//!
//! - [`CliArgs`]: clap-derived arguments and subcommands
//! - [`CausewayConfig`]: file and environment configuration via `confyg`
//! - [`CausewayCli`]: loads the configuration, sets up logging and
//!   dispatches to the handlers

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod search_handlers;

pub use app::CausewayCli;
pub use cli::{CliArgs, Command, ConfigAction, SearchArgs};
pub use config::{CausewayConfig, ConfigKey, OutputConfig};
