use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier of a node within a graph.
pub type NodeId = String;

/// Handle name used when an edge omits its source or target handle.
pub const DEFAULT_HANDLE: &str = "default";

/// A single node of a workflow graph.
///
/// `data` is the node's configuration payload: an opaque string-keyed mapping
/// of arbitrary JSON values whose meaning belongs entirely to the editor.
/// `ui_properties` carries presentation state (canvas position, collapse
/// flags) and is treated as one atomic blob during diffing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Dot-separated namespaced type, e.g. `"core.logic.branch"`.
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: AHashMap<String, Value>,
    #[serde(default, alias = "uiProperties")]
    pub ui_properties: Value,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            data: AHashMap::new(),
            ui_properties: Value::Null,
        }
    }

    /// The last dot-segment of the namespaced type:
    /// `"core.logic.branch"` yields `"branch"`.
    pub fn type_suffix(&self) -> &str {
        type_suffix(&self.node_type)
    }
}

/// The last dot-segment of a namespaced node type.
pub fn type_suffix(node_type: &str) -> &str {
    node_type.rsplit('.').next().unwrap_or(node_type)
}

/// A directed connection between two nodes.
///
/// The edge's own `id` exists for the editor's benefit only and never
/// participates in identity comparisons; see [`Edge::endpoints`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, alias = "sourceHandle", skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, alias = "targetHandle", skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// The composite identity key of this edge. Two edges with different ids
    /// but identical endpoints and handles are the same edge.
    pub fn endpoints(&self) -> EdgeEndpoints {
        EdgeEndpoints {
            source: self.source.clone(),
            source_handle: self
                .source_handle
                .clone()
                .unwrap_or_else(|| DEFAULT_HANDLE.to_string()),
            target: self.target.clone(),
            target_handle: self
                .target_handle
                .clone()
                .unwrap_or_else(|| DEFAULT_HANDLE.to_string()),
        }
    }
}

/// Hashable edge identity: `(source, source_handle, target, target_handle)`
/// with absent handles normalized to [`DEFAULT_HANDLE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeEndpoints {
    pub source: NodeId,
    pub source_handle: String,
    pub target: NodeId,
    pub target_handle: String,
}

/// The snapshot payload: a set of nodes and a set of edges, pure data.
///
/// Both fields default to empty so that malformed snapshots (missing
/// `nodes` or `edges`) deserialize as empty graphs instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
