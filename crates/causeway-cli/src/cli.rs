//! CLI argument parsing and command definitions.
//!
//! Global flags select the configuration file and verbosity; subcommands
//! run a search, inspect graph files, or manage the configuration.

use clap::{Args, Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "causeway", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "CAUSEWAY_CONFIG", global = true)]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a causal search against the d-separation oracle of a DAG.
    Search(SearchArgs),

    /// Check a graph file for cycles and unusual edges.
    Validate {
        /// Graph JSON file.
        graph: String,

        /// Require a DAG: every edge directed, no cycles.
        #[arg(long)]
        dag: bool,
    },

    /// Show graph statistics.
    Stats {
        /// Graph JSON file.
        graph: String,

        /// Number of nodes to list by parent and child count.
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Configuration operations.
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

/// Arguments of `causeway search`. Unset options fall back to the
/// configuration file.
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// DAG JSON file whose d-separation facts answer the independence tests.
    #[arg(long)]
    pub dag: String,

    /// Background knowledge TOML file.
    #[arg(short, long)]
    pub knowledge: Option<String>,

    /// Write the result as JSON to this file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Collider strategy: sepsets, conservative or max_p.
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Conflict policy: prioritize_existing, orient_bidirected or
    /// overwrite_existing.
    #[arg(long)]
    pub policy: Option<String>,

    /// Largest conditioning-set size; -1 for unbounded.
    #[arg(short, long, allow_hyphen_values = true)]
    pub depth: Option<i64>,

    /// Use the order-independent adjacency search.
    #[arg(long, conflicts_with = "unstable")]
    pub stable: bool,

    /// Use the order-dependent adjacency search.
    #[arg(long)]
    pub unstable: bool,

    /// Skip orientations that would create a directed cycle.
    #[arg(long)]
    pub prevent_cycles: bool,
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "search.depth").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "search.depth").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the effective settings as `CAUSEWAY_*` environment variables.
    Export,
}

// ============================================================================
// Tests
// ============================================================================
