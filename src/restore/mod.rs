//! Applying a historical snapshot as the new current graph.
//!
//! Restoring never rewrites history: it appends a new `restore`-typed
//! version through the store. The read-only comparison against the current
//! editor state is a separate operation that never saves.

use crate::diff::{GraphDiff, compute_diff};
use crate::error::HistoryError;
use crate::graph::Graph;
use crate::store::{SaveType, Version, VersionStore};
use tracing::debug;

/// The outcome of a restore: the graph to install as the editor's current
/// state, and the freshly appended version record.
#[derive(Debug, Clone)]
pub struct RestoredVersion {
    pub graph: Graph,
    pub version: Version,
}

/// Restores the workflow to the snapshot stored under `version_id`.
///
/// The historical snapshot is cloned and committed as a new version with
/// `save_type = restore`, so the workflow's version count grows by exactly
/// one and no existing version is touched.
pub fn restore_version(
    store: &mut VersionStore,
    version_id: &str,
) -> Result<RestoredVersion, HistoryError> {
    let target = store
        .get_version(version_id)
        .cloned()
        .ok_or_else(|| HistoryError::VersionNotFound(version_id.to_string()))?;

    let description = Some(format!("Restored from version {}", target.version_number));
    let version = store.save_version(
        &target.workflow_id,
        &target.graph_snapshot,
        SaveType::Restore,
        description,
    );

    debug!(
        workflow_id = target.workflow_id.as_str(),
        restored_from = target.version_number,
        new_version = version.version_number,
        "restored version"
    );

    Ok(RestoredVersion {
        graph: target.graph_snapshot,
        version,
    })
}

/// Read-only comparison of a stored snapshot against the caller's current
/// graph. Invokes the diff engine only; nothing is saved.
pub fn compare_with_current(
    store: &VersionStore,
    version_id: &str,
    current: Option<&Graph>,
) -> Result<GraphDiff, HistoryError> {
    let target = store
        .get_version(version_id)
        .ok_or_else(|| HistoryError::VersionNotFound(version_id.to_string()))?;
    Ok(compute_diff(Some(&target.graph_snapshot), current))
}
