//! Handler functions for search and graph-inspection commands.
//!
//! These functions implement the logic behind `search`, `validate` and
//! `stats`. The search answers independence questions from the
//! d-separation structure of a DAG file, so a run shows how much of the
//! true structure each strategy recovers.

use crate::cli::SearchArgs;
use crate::config::CausewayConfig;
use causeway_core::{CancellationFlag, Error, Result};
use causeway_graph::{
    DegreeDirection, Graph, compute_stats, load_graph, top_nodes_by_degree, validate_dag,
    validate_graph,
};
use causeway_search::{
    DSeparationOracle, Knowledge, PcSearch, SearchConfig, SearchResult, load_knowledge,
    save_result,
};
use std::path::Path;

// ============================================================================
// Search
// ============================================================================

/// Merge command-line overrides into the configured search settings.
pub fn effective_search_config(config: &CausewayConfig, args: &SearchArgs) -> Result<SearchConfig> {
    let mut search = config.search.clone();
    if let Some(strategy) = &args.strategy {
        search.collider_strategy = strategy.parse()?;
    }
    if let Some(policy) = &args.policy {
        search.conflict_policy = policy.parse()?;
    }
    if let Some(depth) = args.depth {
        search.depth = depth;
    }
    if args.stable {
        search.stable = true;
    }
    if args.unstable {
        search.stable = false;
    }
    if args.prevent_cycles {
        search.prevent_cycles = true;
    }
    search.validate()?;
    Ok(search)
}

/// Run a search over the DAG in `args.dag`. Ctrl-C stops the search
/// cooperatively; the partial result is still reported.
pub async fn handle_search(config: &CausewayConfig, args: SearchArgs) -> Result<SearchResult> {
    let cancel = CancellationFlag::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("interrupt received, stopping search");
                cancel.cancel();
            }
        }
    });

    let result = handle_search_with_cancellation(config, args, cancel).await;
    watcher.abort();
    result
}

/// [`handle_search`] with a caller-owned cancellation flag.
pub async fn handle_search_with_cancellation(
    config: &CausewayConfig,
    args: SearchArgs,
    cancel: CancellationFlag,
) -> Result<SearchResult> {
    let search_config = effective_search_config(config, &args)?;
    let dag = load_graph_or_error(Path::new(&args.dag))?;

    let knowledge = match args.knowledge.as_ref().or(config.output.knowledge_path.as_ref()) {
        Some(path) => load_knowledge(path)?,
        None => Knowledge::empty(),
    };

    let result = tokio::task::spawn_blocking({
        let search_config = search_config.clone();
        move || {
            let mut oracle = DSeparationOracle::new(dag)?;
            PcSearch::new(&mut oracle, search_config)
                .with_knowledge(knowledge)
                .with_cancellation(cancel)
                .run()
        }
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(format!("search task failed: {e}"))))??;

    print_summary(&result, &search_config);
    if !result.complete {
        println!("\nSearch interrupted; the result is partial.");
    }

    match args.output.as_ref().or(config.output.result_path.as_ref()) {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
            }
            save_result(&result, Some(&search_config), path)?;
            println!("\nResult saved to: {}", path.display());
        }
        None => {
            println!("\nEdges:");
            for edge in result.graph.edges() {
                println!("  {edge}");
            }
        }
    }

    Ok(result)
}

fn print_summary(result: &SearchResult, config: &SearchConfig) {
    let stats = &result.stats;
    println!("Search ({})", config.collider_strategy);
    println!("=================");
    println!("Complete:         {}", result.complete);
    println!("Oracle calls:     {}", stats.oracle_calls);
    println!("Depth reached:    {}", stats.depth_reached);
    println!("Edges:            {}", result.graph.edge_count());
    println!("  Removed:        {}", stats.edges_removed);
    println!("  By knowledge:   {}", stats.removed_by_knowledge);
    println!("Colliders:        {}", result.collider_triples.len());
    println!("Noncolliders:     {}", result.noncollider_triples.len());
    println!("Ambiguous:        {}", result.ambiguous_triples.len());
    println!("Meek orientations: {} in {} pass(es)", stats.meek_orientations, stats.meek_passes);
    if !stats.meek_converged && result.complete {
        println!("  WARNING: orientation rules did not converge.");
    }
}

// ============================================================================
// Graph inspection
// ============================================================================

/// Validate a graph file. Returns whether it passed.
pub async fn handle_validate(path: &str, require_dag: bool) -> Result<bool> {
    let graph = load_graph_or_error(Path::new(path))?;
    let result = if require_dag {
        validate_dag(&graph)
    } else {
        validate_graph(&graph)
    };

    if result.valid {
        println!("Graph is valid.");
    } else {
        println!("Graph has validation issues:");
    }

    for error in &result.errors {
        println!("  ERROR [{}]: {}", error.code, error.message);
        for node in &error.nodes {
            println!("    - {node}");
        }
        for edge in &error.edges {
            println!("    - {edge}");
        }
    }

    for warning in &result.warnings {
        println!("  WARN  [{}]: {}", warning.code, warning.message);
        for node in &warning.nodes {
            println!("    - {node}");
        }
    }

    for info in &result.info {
        println!("  INFO  [{}]: {}", info.code, info.message);
    }

    println!(
        "\nSummary: {} error(s), {} warning(s)",
        result.errors.len(),
        result.warnings.len()
    );

    Ok(result.valid)
}

/// Print statistics for a graph file.
pub async fn handle_stats(path: &str, top: usize) -> Result<()> {
    let graph = load_graph_or_error(Path::new(path))?;
    let stats = compute_stats(&graph);

    println!("Graph Statistics");
    println!("================");
    println!("Nodes:          {}", stats.node_count);
    println!("  Isolated:     {}", stats.isolated_count);
    println!("Edges:          {}", stats.edge_count);
    println!("Avg degree:     {:.2}", stats.avg_degree);
    println!("Max in-degree:  {}", stats.max_in_degree);
    println!("Max out-degree: {}", stats.max_out_degree);

    if !stats.kind_distribution.is_empty() {
        println!("\nEdge kinds:");
        for (kind, count) in &stats.kind_distribution {
            println!("  {kind}: {count}");
        }
    }

    if top > 0 && graph.edge_count() > 0 {
        print_top(&graph, top, DegreeDirection::In, "Most parents");
        print_top(&graph, top, DegreeDirection::Out, "Most children");
    }

    Ok(())
}

fn print_top(graph: &Graph, top: usize, direction: DegreeDirection, title: &str) {
    println!("\n{title}:");
    for (name, degree) in top_nodes_by_degree(graph, top, direction) {
        if degree > 0 {
            println!("  {name}: {degree}");
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load_graph_or_error(path: &Path) -> Result<Graph> {
    if !path.exists() {
        return Err(Error::not_found(format!(
            "graph file {}",
            path.display()
        )));
    }
    load_graph(path)
}

// ============================================================================
// Tests
// ============================================================================
