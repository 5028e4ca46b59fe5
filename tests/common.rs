//! Common test utilities for building graphs and version records.
use chrono::{DateTime, Duration, Utc};
use kiroku::prelude::*;
use serde_json::Value;

/// Creates a node with an empty payload.
#[allow(dead_code)]
pub fn node(id: &str, node_type: &str) -> Node {
    Node::new(id, node_type)
}

/// Creates a node carrying a single `data` entry.
#[allow(dead_code)]
pub fn node_with_data(id: &str, node_type: &str, key: &str, value: Value) -> Node {
    let mut node = Node::new(id, node_type);
    node.data.insert(key.to_string(), value);
    node
}

/// Creates an edge with default (absent) handles.
#[allow(dead_code)]
pub fn edge(id: &str, source: &str, target: &str) -> Edge {
    Edge::new(id, source, target)
}

/// Creates an edge with explicit handles.
#[allow(dead_code)]
pub fn edge_with_handles(
    id: &str,
    source: &str,
    source_handle: &str,
    target: &str,
    target_handle: &str,
) -> Edge {
    let mut edge = Edge::new(id, source, target);
    edge.source_handle = Some(source_handle.to_string());
    edge.target_handle = Some(target_handle.to_string());
    edge
}

#[allow(dead_code)]
pub fn graph_of(nodes: Vec<Node>, edges: Vec<Edge>) -> Graph {
    Graph { nodes, edges }
}

#[allow(dead_code)]
pub fn empty_graph() -> Graph {
    Graph::new()
}

/// Builds a version record with a deterministic id and a timestamp the given
/// number of days in the past.
#[allow(dead_code)]
pub fn version(
    workflow: &str,
    number: u32,
    save_type: SaveType,
    days_ago: i64,
    pinned: bool,
    graph: Graph,
) -> Version {
    version_at(
        workflow,
        number,
        save_type,
        Utc::now() - Duration::days(days_ago),
        pinned,
        graph,
    )
}

/// Builds a version record with an explicit creation timestamp.
#[allow(dead_code)]
pub fn version_at(
    workflow: &str,
    number: u32,
    save_type: SaveType,
    created_at: DateTime<Utc>,
    pinned: bool,
    graph: Graph,
) -> Version {
    Version {
        id: format!("{}-v{}", workflow, number),
        workflow_id: workflow.to_string(),
        version_number: number,
        created_at,
        save_type,
        description: None,
        graph_snapshot: graph,
        size_bytes: 0,
        is_pinned: pinned,
        branch_id: None,
    }
}
