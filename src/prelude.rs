//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! kiroku crate. Import this module to get access to the core functionality
//! without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! // Use the prelude to get easy access to all the core types.
//! use kiroku::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load a persisted store and inspect a workflow's history.
//! let snapshot = StoreSnapshot::from_file("path/to/store.json")?;
//! let store = VersionStore::from_snapshot(snapshot);
//!
//! for version in store.get_versions("my-workflow") {
//!     println!("v{} ({})", version.version_number, version.save_type);
//! }
//!
//! // Diff the two most recent snapshots.
//! let versions = store.get_versions("my-workflow");
//! if let [newest, previous, ..] = versions {
//!     let diff = compute_diff(Some(&previous.graph_snapshot), Some(&newest.graph_snapshot));
//!     println!("{} changes", diff.change_count());
//! }
//! # Ok(())
//! # }
//! ```

// Snapshot model
pub use crate::graph::{DEFAULT_HANDLE, Edge, EdgeEndpoints, Graph, IntoGraph, Node};

// Version store and persistence
pub use crate::store::{
    SaveType, StoreSnapshot, Version, VersionPage, VersionStore, is_eligible_for_autosave,
};

// Diffing
pub use crate::diff::{GraphDiff, NodeModification, PropertyChange, compute_diff, deep_equal};

// Retention and branching
pub use crate::branch::{Branch, BranchManager};
pub use crate::retention::RetentionPolicy;

// Analytics
pub use crate::analytics::{EvolutionReport, EvolutionSummary, VersionMetrics, analyze};

// Restore
pub use crate::restore::{RestoredVersion, compare_with_current, restore_version};

// Error types
pub use crate::error::{GraphConversionError, HistoryError, PersistError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
