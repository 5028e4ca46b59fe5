use super::model::Graph;
use crate::error::GraphConversionError;

/// A trait for custom editor data models that can be converted into a `Graph`.
///
/// This is the primary extension point for keeping the engine format-agnostic.
/// Visual editors all export slightly different JSON shapes (camelCase keys,
/// nested payload wrappers, extra presentation fields); implementing this
/// trait on your own parse structs provides the translation layer into the
/// canonical snapshot model that the store and diff engine operate on.
///
/// # Example
///
/// ```rust,no_run
/// use kiroku::error::GraphConversionError;
/// use kiroku::graph::{Graph, IntoGraph, Node};
///
/// // 1. Define your custom structs for parsing your editor's format.
/// struct MyEditorNode { id: String, kind: String }
/// struct MyEditorDocument { nodes: Vec<MyEditorNode> }
///
/// // 2. Implement `IntoGraph` for your top-level struct.
/// impl IntoGraph for MyEditorDocument {
///     fn into_graph(self) -> Result<Graph, GraphConversionError> {
///         let mut graph = Graph::new();
///         for node in self.nodes {
///             // Your logic to map editor nodes onto canonical nodes.
///             graph.nodes.push(Node::new(node.id, node.kind));
///         }
///         // Convert your edges here as well.
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a canonical workflow graph.
    fn into_graph(self) -> Result<Graph, GraphConversionError>;
}
