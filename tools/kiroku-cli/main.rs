use clap::{Parser, Subcommand};
use kiroku::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::fs;

// --- JSON Deserialization Structs (Input Format Specific) ---
// These structs match the React-Flow style editor export and are only used
// here for conversion into the canonical graph model.

#[derive(Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    data: serde_json::Map<String, Value>,
    #[serde(default, alias = "uiProperties")]
    ui_properties: Value,
}

#[derive(Deserialize)]
struct RawEdge {
    id: String,
    source: String,
    target: String,
    #[serde(default, alias = "sourceHandle")]
    source_handle: Option<String>,
    #[serde(default, alias = "targetHandle")]
    target_handle: Option<String>,
}

// --- Converter Implementation ---
// This implements the conversion from the raw JSON model to the canonical Graph.

impl IntoGraph for RawGraph {
    fn into_graph(self) -> std::result::Result<Graph, GraphConversionError> {
        let mut graph = Graph::new();

        for raw_node in self.nodes {
            if graph.nodes.iter().any(|n| n.id == raw_node.id) {
                return Err(GraphConversionError::ValidationError(format!(
                    "duplicate node id '{}'",
                    raw_node.id
                )));
            }
            let mut node = Node::new(raw_node.id, raw_node.node_type);
            node.data = raw_node.data.into_iter().collect();
            node.ui_properties = raw_node.ui_properties;
            graph.nodes.push(node);
        }

        for raw_edge in self.edges {
            graph.edges.push(Edge {
                id: raw_edge.id,
                source: raw_edge.source,
                target: raw_edge.target,
                source_handle: raw_edge.source_handle,
                target_handle: raw_edge.target_handle,
            });
        }

        Ok(graph)
    }
}

/// A version control and structural diff engine CLI for workflow graph stores
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the store JSON file
    #[arg(short, long, default_value = "store.json")]
    store: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a workflow's versions, newest first
    History {
        workflow: String,
        /// Page size (0 means everything)
        #[arg(long, default_value_t = 0)]
        limit: usize,
        /// Page cursor from a previous invocation
        #[arg(long)]
        cursor: Option<usize>,
    },
    /// Commit a graph export as a new manual version
    Commit {
        workflow: String,
        /// Path to the editor's graph JSON export
        graph: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Structural diff between two version numbers of a workflow
    Diff {
        workflow: String,
        from: u32,
        to: u32,
        /// Print the full diff as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Derived evolution analytics for a workflow's history
    Analyze { workflow: String },
    /// Prune a workflow's history by age and count
    Prune {
        workflow: String,
        #[arg(long, default_value_t = 50)]
        max_versions: usize,
        #[arg(long, default_value_t = 90)]
        keep_manual_days: i64,
        #[arg(long, default_value_t = 7)]
        keep_autosave_days: i64,
    },
    /// Pin or unpin a version by id
    Pin {
        version_id: String,
        #[arg(long)]
        unpin: bool,
    },
    /// Restore a version by id, appending a new restore-typed version
    Restore { version_id: String },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::History {
            workflow,
            limit,
            cursor,
        } => run_history(&cli.store, &workflow, limit, cursor),
        Command::Commit {
            workflow,
            graph,
            description,
        } => run_commit(&cli.store, &workflow, &graph, description),
        Command::Diff {
            workflow,
            from,
            to,
            json,
        } => run_diff(&cli.store, &workflow, from, to, json),
        Command::Analyze { workflow } => run_analyze(&cli.store, &workflow),
        Command::Prune {
            workflow,
            max_versions,
            keep_manual_days,
            keep_autosave_days,
        } => run_prune(
            &cli.store,
            &workflow,
            RetentionPolicy::new(max_versions, keep_manual_days, keep_autosave_days),
        ),
        Command::Pin { version_id, unpin } => run_pin(&cli.store, &version_id, !unpin),
        Command::Restore { version_id } => run_restore(&cli.store, &version_id),
    }
}

/// Loads the store file; a missing file starts an empty store.
fn load_store(path: &str) -> VersionStore {
    if !std::path::Path::new(path).exists() {
        return VersionStore::new();
    }
    let snapshot = StoreSnapshot::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load store '{}': {}", path, e)));
    VersionStore::from_snapshot(snapshot)
}

fn save_store(path: &str, store: &VersionStore) {
    store
        .snapshot()
        .save(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to save store '{}': {}", path, e)));
}

fn run_history(store_path: &str, workflow: &str, limit: usize, cursor: Option<usize>) {
    let store = load_store(store_path);
    let page = if limit == 0 {
        store.list_versions(workflow, cursor, usize::MAX)
    } else {
        store.list_versions(workflow, cursor, limit)
    };

    if page.total == 0 {
        println!("No versions stored for workflow '{}'.", workflow);
        return;
    }

    println!("History of '{}' ({} versions total):", workflow, page.total);
    for version in &page.versions {
        println!(
            "  v{:<4} {} {:>10} {:>8} bytes{}{}",
            version.version_number,
            version.created_at.format("%Y-%m-%d %H:%M:%S"),
            version.save_type.as_str(),
            version.size_bytes,
            if version.is_pinned { "  [pinned]" } else { "" },
            version
                .description
                .as_deref()
                .map(|d| format!("  {}", d))
                .unwrap_or_default(),
        );
    }
    if let Some(next) = page.next_cursor {
        println!("More available; pass --cursor {}", next);
    }
}

fn run_commit(store_path: &str, workflow: &str, graph_path: &str, description: Option<String>) {
    let graph_json = fs::read_to_string(graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read graph file '{}': {}", graph_path, e))
    });
    let raw_graph: RawGraph = serde_json::from_str(&graph_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse graph JSON: {}", e)));
    let graph = raw_graph
        .into_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert graph: {}", e)));

    let mut store = load_store(store_path);
    let version = store.save_version(workflow, &graph, SaveType::Manual, description);
    save_store(store_path, &store);

    println!(
        "Committed v{} of '{}' ({} nodes, {} edges, {} bytes).",
        version.version_number,
        workflow,
        version.graph_snapshot.node_count(),
        version.graph_snapshot.edge_count(),
        version.size_bytes
    );
}

fn run_diff(store_path: &str, workflow: &str, from: u32, to: u32, json: bool) {
    let store = load_store(store_path);
    let old = store
        .get_version_by_number(workflow, from)
        .unwrap_or_else(|| {
            exit_with_error(&format!("Version {} not found for '{}'", from, workflow))
        });
    let new = store
        .get_version_by_number(workflow, to)
        .unwrap_or_else(|| exit_with_error(&format!("Version {} not found for '{}'", to, workflow)));

    let diff = compute_diff(Some(&old.graph_snapshot), Some(&new.graph_snapshot));

    if json {
        let rendered = serde_json::to_string_pretty(&diff)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to render diff: {}", e)));
        println!("{}", rendered);
        return;
    }

    println!("Diff of '{}' v{} -> v{}:", workflow, from, to);
    if !diff.has_changes {
        println!("  No structural changes.");
        return;
    }
    println!("  Added nodes:    {}", diff.added_nodes.len());
    println!("  Removed nodes:  {}", diff.removed_nodes.len());
    println!("  Modified nodes: {}", diff.modified_nodes.len());
    for modification in &diff.modified_nodes {
        for change in &modification.changes {
            println!(
                "    {}.{}: {} -> {}",
                modification.node_id,
                change.key,
                render_value(&change.old_value),
                render_value(&change.new_value)
            );
        }
    }
    println!("  Added edges:    {}", diff.added_edges.len());
    println!("  Removed edges:  {}", diff.removed_edges.len());
}

fn render_value(value: &Option<Value>) -> String {
    match value {
        None => "<absent>".to_string(),
        Some(v) => v.to_string(),
    }
}

fn run_analyze(store_path: &str, workflow: &str) {
    let store = load_store(store_path);
    let report = analyze(store.get_versions(workflow));

    println!("Evolution of '{}':", workflow);
    println!("  Versions:          {}", report.summary.total_versions);
    println!("  Edits:             {}", report.summary.total_edits);
    println!(
        "  Avg nodes/version: {:.1}",
        report.summary.average_nodes_per_version
    );
    println!(
        "  Growth (nodes/edges/complexity): {:.1}% / {:.1}% / {:.1}%",
        report.summary.node_growth_rate,
        report.summary.edge_growth_rate,
        report.summary.complexity_growth_rate
    );
    println!("  Span:              {}s", report.summary.version_span_seconds);
    println!("  Most productive:   {}", report.summary.most_productive_day);

    if let Some(peak) = &report.peak_complexity {
        println!(
            "  Peak complexity:   v{} (complexity {})",
            peak.version_number, peak.complexity
        );
    }
    if let Some(most_changed) = &report.most_changed {
        println!(
            "  Most changed:      v{} ({:+} complexity)",
            most_changed.version_number, most_changed.delta_from_previous
        );
    }
    if !report.node_type_churn.is_empty() {
        println!("  Node type churn:");
        for churn in &report.node_type_churn {
            println!(
                "    {:<20} +{} -{} ~{}",
                churn.node_type, churn.added_count, churn.removed_count, churn.modified_count
            );
        }
    }
}

fn run_prune(store_path: &str, workflow: &str, policy: RetentionPolicy) {
    let mut store = load_store(store_path);
    let removed = store.prune_old_versions(workflow, &policy);
    save_store(store_path, &store);
    println!(
        "Pruned {} version(s) from '{}'; {} remain.",
        removed,
        workflow,
        store.get_versions(workflow).len()
    );
}

fn run_pin(store_path: &str, version_id: &str, pinned: bool) {
    let mut store = load_store(store_path);
    if store.get_version(version_id).is_none() {
        exit_with_error(&format!("Version '{}' not found", version_id));
    }
    store.pin_version(version_id, pinned);
    save_store(store_path, &store);
    println!(
        "{} version '{}'.",
        if pinned { "Pinned" } else { "Unpinned" },
        version_id
    );
}

fn run_restore(store_path: &str, version_id: &str) {
    let mut store = load_store(store_path);
    let restored = restore_version(&mut store, version_id)
        .unwrap_or_else(|e| exit_with_error(&format!("Restore failed: {}", e)));
    save_store(store_path, &store);
    println!(
        "Appended v{} to '{}' ({}).",
        restored.version.version_number,
        restored.version.workflow_id,
        restored.version.description.as_deref().unwrap_or("restore")
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
