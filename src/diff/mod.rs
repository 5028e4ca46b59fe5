//! Structural comparison of two graph snapshots.
//!
//! The diff engine is a pure, total function over the snapshot model: it
//! never fails, and an absent graph degrades to a full-add or full-remove
//! diff. Results depend only on the set of node and edge identities plus
//! value equality, never on array ordering.

mod equality;

pub use equality::deep_equal;

use crate::graph::{Edge, EdgeEndpoints, Graph, Node};
use ahash::AHashMap;
use serde::Serialize;
use serde_json::Value;

/// A single property-level change on a node present on both sides.
///
/// A side holding `None` means the key was absent there; `Some(Value::Null)`
/// is an explicit null. The two never compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyChange {
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// A node whose id survives across both snapshots but whose payload changed.
#[derive(Debug, Clone, Serialize)]
pub struct NodeModification {
    pub node_id: String,
    pub node_type: String,
    pub changes: Vec<PropertyChange>,
}

/// The structural difference between two snapshots.
///
/// Nodes partition into added/removed/modified; unchanged nodes are omitted
/// entirely. Edges carry no mutable payload, so they are only ever added or
/// removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphDiff {
    pub added_nodes: Vec<Node>,
    pub removed_nodes: Vec<Node>,
    pub modified_nodes: Vec<NodeModification>,
    pub added_edges: Vec<Edge>,
    pub removed_edges: Vec<Edge>,
    pub has_changes: bool,
}

impl GraphDiff {
    /// A diff reporting no changes at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of reported entries across all five lists.
    pub fn change_count(&self) -> usize {
        self.added_nodes.len()
            + self.removed_nodes.len()
            + self.modified_nodes.len()
            + self.added_edges.len()
            + self.removed_edges.len()
    }

    fn finalize(mut self) -> Self {
        self.has_changes = self.change_count() > 0;
        self
    }
}

/// Computes the structural diff between two optional snapshots.
///
/// Both absent yields the empty diff; one absent side degrades to a full
/// addition or full removal of the present side. Runs in O(N + E) via
/// hash-map indexing of node ids and edge endpoint keys.
pub fn compute_diff(old: Option<&Graph>, new: Option<&Graph>) -> GraphDiff {
    match (old, new) {
        (None, None) => GraphDiff::empty(),
        (None, Some(new)) => GraphDiff {
            added_nodes: new.nodes.clone(),
            added_edges: new.edges.clone(),
            ..GraphDiff::default()
        }
        .finalize(),
        (Some(old), None) => GraphDiff {
            removed_nodes: old.nodes.clone(),
            removed_edges: old.edges.clone(),
            ..GraphDiff::default()
        }
        .finalize(),
        (Some(old), Some(new)) => diff_graphs(old, new),
    }
}

fn diff_graphs(old: &Graph, new: &Graph) -> GraphDiff {
    let old_nodes: AHashMap<&str, &Node> =
        old.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let new_nodes: AHashMap<&str, &Node> =
        new.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut diff = GraphDiff::default();

    for node in &new.nodes {
        if !old_nodes.contains_key(node.id.as_str()) {
            diff.added_nodes.push(node.clone());
        }
    }

    for node in &old.nodes {
        match new_nodes.get(node.id.as_str()) {
            None => diff.removed_nodes.push(node.clone()),
            Some(new_node) => {
                let changes = diff_node_properties(node, new_node);
                if !changes.is_empty() {
                    diff.modified_nodes.push(NodeModification {
                        node_id: node.id.clone(),
                        node_type: new_node.node_type.clone(),
                        changes,
                    });
                }
            }
        }
    }

    let old_edges: AHashMap<EdgeEndpoints, &Edge> =
        old.edges.iter().map(|e| (e.endpoints(), e)).collect();
    let new_edges: AHashMap<EdgeEndpoints, &Edge> =
        new.edges.iter().map(|e| (e.endpoints(), e)).collect();

    for edge in &new.edges {
        if !old_edges.contains_key(&edge.endpoints()) {
            diff.added_edges.push(edge.clone());
        }
    }
    for edge in &old.edges {
        if !new_edges.contains_key(&edge.endpoints()) {
            diff.removed_edges.push(edge.clone());
        }
    }

    diff.finalize()
}

/// Property-level comparison of two payloads sharing a node id.
///
/// `data` is compared key-by-key over the union of both key-sets;
/// `ui_properties` is compared as one atomic blob and, when unequal,
/// contributes exactly one change record under the key `"ui_properties"`.
fn diff_node_properties(old: &Node, new: &Node) -> Vec<PropertyChange> {
    let mut changes = Vec::new();

    let mut keys: Vec<&str> = old
        .data
        .keys()
        .chain(new.data.keys())
        .map(String::as_str)
        .collect();
    // Sorted for deterministic change-record order; hash maps iterate arbitrarily.
    keys.sort_unstable();
    keys.dedup();

    for key in keys {
        let old_value = old.data.get(key);
        let new_value = new.data.get(key);
        let equal = match (old_value, new_value) {
            (Some(l), Some(r)) => deep_equal(l, r),
            (None, None) => true,
            // Present-with-null versus absent stays a change.
            _ => false,
        };
        if !equal {
            changes.push(PropertyChange {
                key: key.to_string(),
                old_value: old_value.cloned(),
                new_value: new_value.cloned(),
            });
        }
    }

    if !deep_equal(&old.ui_properties, &new.ui_properties) {
        changes.push(PropertyChange {
            key: "ui_properties".to_string(),
            old_value: Some(old.ui_properties.clone()),
            new_value: Some(new.ui_properties.clone()),
        });
    }

    changes
}
