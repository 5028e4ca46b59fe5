//! # Kiroku - Workflow Graph Version Control Engine
//!
//! **Kiroku** provides version control for directed node-graphs that represent
//! user-authored workflows: it stores immutable snapshots over time, organizes
//! them into branches, enforces a retention policy that reclaims storage while
//! protecting pinned snapshots, and computes structural diffs between any two
//! snapshots at node/edge/property granularity.
//!
//! ## Core Workflow
//!
//! The engine is designed to be format-agnostic. It operates on a canonical
//! snapshot model of a workflow graph. The primary workflow is:
//!
//! 1.  **Load Your Data**: Parse your editor's export format (e.g. a React-Flow
//!     style JSON document) into your own Rust structs.
//! 2.  **Convert to Kiroku's Model**: Implement the `IntoGraph` trait for your
//!     structs to provide a translation layer into the canonical `Graph`.
//! 3.  **Save**: Commit snapshots through the `VersionStore`; every save is a
//!     deep, immutable copy with a monotonically increasing version number.
//! 4.  **Compare, Prune, Restore**: Diff any two stored snapshots, apply a
//!     `RetentionPolicy` to reclaim storage, fold the whole history into an
//!     `EvolutionReport`, or restore a historical snapshot as a new version.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kiroku::prelude::*;
//! use serde_json::json;
//!
//! fn main() {
//!     let mut store = VersionStore::new();
//!
//!     // Build a small graph and commit it.
//!     let mut node = Node::new("start", "core.flow.start");
//!     node.data.insert("label".to_string(), json!("Start"));
//!     let mut graph = Graph::new();
//!     graph.nodes.push(node);
//!
//!     let first = store.save_version("wf-1", &graph, SaveType::Manual, None);
//!     assert_eq!(first.version_number, 1);
//!
//!     // Grow the graph and commit again.
//!     graph.nodes.push(Node::new("end", "core.flow.end"));
//!     graph.edges.push(Edge::new("e1", "start", "end"));
//!     let second = store.save_version("wf-1", &graph, SaveType::Manual, None);
//!
//!     // Structural diff between the two snapshots.
//!     let diff = compute_diff(
//!         Some(&first.graph_snapshot),
//!         Some(&second.graph_snapshot),
//!     );
//!     assert!(diff.has_changes);
//!     assert_eq!(diff.added_nodes.len(), 1);
//!
//!     // Keep at most 50 versions: manual saves for 90 days, autosaves for 7.
//!     let policy = RetentionPolicy::new(50, 90, 7);
//!     store.prune_old_versions("wf-1", &policy);
//!
//!     // Restore appends; it never rewrites history.
//!     let restored = restore_version(&mut store, &first.id).unwrap();
//!     assert_eq!(restored.version.save_type, SaveType::Restore);
//!     assert_eq!(store.get_versions("wf-1").len(), 3);
//! }
//! ```

pub mod analytics;
pub mod branch;
pub mod diff;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod restore;
pub mod retention;
pub mod store;
