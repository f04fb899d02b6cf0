//! Causeway CLI application.
//!
//! Loads the configuration, initialises logging and dispatches commands.

use crate::cli::{CliArgs, Command};
use crate::config::CausewayConfig;
use crate::{config_handlers, search_handlers};
use causeway_core::{Error, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ============================================================================
// CausewayCli
// ============================================================================

/// The CLI application.
pub struct CausewayCli {
    name: String,
    config: Arc<CausewayConfig>,
    version: String,
}

impl CausewayCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = CausewayConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: CausewayConfig) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &CausewayConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    /// Library crates log through `log`; the fmt subscriber picks those
    /// records up as well.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Search(search)) => {
                let result = search_handlers::handle_search(&self.config, search).await?;
                if !result.complete {
                    tracing::warn!("search stopped before completion");
                }
                Ok(())
            }
            Some(Command::Validate { graph, dag }) => {
                if search_handlers::handle_validate(&graph, dag).await? {
                    Ok(())
                } else {
                    Err(Error::graph(format!("{graph} failed validation")))
                }
            }
            Some(Command::Stats { graph, top }) => search_handlers::handle_stats(&graph, top).await,
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            None => {
                println!("{} {} - use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use causeway_graph::{Edge, Graph, Node, save_graph};

    #[test]
    fn test_causeway_cli_new() {
        let cli = CausewayCli::new("causeway", CausewayConfig::default()).with_version("1.2.3");
        assert_eq!(cli.name, "causeway");
        assert_eq!(cli.version, "1.2.3");
        assert!(cli.config().output.result_path.is_none());
    }

    #[tokio::test]
    async fn test_run_version_command() {
        let cli = CausewayCli::new("causeway", CausewayConfig::default());
        let args = CliArgs::parse_from(["causeway", "version"]);
        assert!(cli.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_no_command() {
        let cli = CausewayCli::new("causeway", CausewayConfig::default());
        let args = CliArgs::parse_from(["causeway"]);
        assert!(cli.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_search_and_validate_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut dag = Graph::from_nodes(["X", "Y", "Z"].map(Node::new)).unwrap();
        dag.add_named_edge(&Edge::directed("X", "Y")).unwrap();
        dag.add_named_edge(&Edge::directed("Z", "Y")).unwrap();
        let dag_path = dir.path().join("truth.json");
        save_graph(&dag, &dag_path, None).unwrap();
        let out = dir.path().join("result.json");

        let cli = CausewayCli::new("causeway", CausewayConfig::default());
        let args = CliArgs::parse_from([
            "causeway",
            "--quiet",
            "search",
            "--dag",
            dag_path.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ]);
        cli.run(args).await.unwrap();
        assert!(out.exists());

        let args = CliArgs::parse_from(["causeway", "stats", dag_path.to_str().unwrap()]);
        assert!(cli.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_validate_fails_for_non_dag() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut graph = Graph::from_nodes(["X", "Y"].map(Node::new)).unwrap();
        graph.add_named_edge(&Edge::undirected("X", "Y")).unwrap();
        let path = dir.path().join("pattern.json");
        save_graph(&graph, &path, None).unwrap();

        let cli = CausewayCli::new("causeway", CausewayConfig::default());
        let args = CliArgs::parse_from(["causeway", "validate", path.to_str().unwrap(), "--dag"]);
        let err = cli.run(args).await.unwrap_err();
        assert!(matches!(err, Error::Graph(_)));
    }

    #[test]
    fn test_from_args_with_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ncollider_strategy = \"conservative\"\n").unwrap();

        let args = CliArgs::parse_from(["causeway", "--config", path.to_str().unwrap()]);
        let cli = CausewayCli::from_args("causeway", &args).unwrap();
        assert_eq!(
            cli.config().search.collider_strategy,
            causeway_search::ColliderStrategy::Conservative
        );
    }

    #[tokio::test]
    async fn test_config_command_dispatch() {
        let cli = CausewayCli::new("causeway", CausewayConfig::default());
        let args = CliArgs::parse_from(["causeway", "config", "path", "--config", "/tmp/c.toml"]);
        assert!(cli.run(args).await.is_ok());
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let cli = CausewayCli::new("causeway", CausewayConfig::default());
        cli.init_logging(false, false);
        cli.init_logging(true, false);
        cli.init_logging(false, true);
    }
}
