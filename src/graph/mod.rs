mod conversion;
mod model;

pub use conversion::IntoGraph;
pub use model::{DEFAULT_HANDLE, Edge, EdgeEndpoints, Graph, Node, NodeId, type_suffix};
