//! In-memory version store: named, numbered snapshots per workflow.
//!
//! The store is an explicit service object owning the `workflow -> versions`
//! mapping. It assumes a single active writer per workflow; the max-plus-one
//! numbering scheme is not atomic across concurrent callers.

mod persist;

pub use persist::StoreSnapshot;

use crate::graph::Graph;
use crate::retention::RetentionPolicy;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Identifier of a workflow, assigned by the editor.
pub type WorkflowId = String;

/// Opaque generated identifier of a stored version.
pub type VersionId = String;

/// Provenance tag of a saved version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveType {
    Manual,
    Autosave,
    Checkpoint,
    Restore,
}

impl SaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveType::Manual => "manual",
            SaveType::Autosave => "autosave",
            SaveType::Checkpoint => "checkpoint",
            SaveType::Restore => "restore",
        }
    }
}

impl fmt::Display for SaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numbered, timestamped snapshot plus its metadata.
///
/// `graph_snapshot` is a deep copy taken at save time and is never mutated
/// afterwards; the only mutable field is the pin flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub workflow_id: WorkflowId,
    /// 1-based, strictly increasing per workflow.
    pub version_number: u32,
    pub created_at: DateTime<Utc>,
    pub save_type: SaveType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub graph_snapshot: Graph,
    /// Length of the canonical JSON encoding of the snapshot.
    pub size_bytes: u64,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

/// One page of a workflow's history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct VersionPage {
    pub versions: Vec<Version>,
    /// Cursor for the next page, absent on the last page.
    pub next_cursor: Option<usize>,
    pub total: usize,
}

/// The version store service object.
///
/// Version lists are kept sorted by `version_number` descending. The edit
/// counters are transient session state and are not part of the persisted
/// snapshot; the last-autosave timestamps are.
#[derive(Debug, Default)]
pub struct VersionStore {
    versions: AHashMap<WorkflowId, Vec<Version>>,
    last_autosave_time: AHashMap<WorkflowId, DateTime<Utc>>,
    edits_since_save: AHashMap<WorkflowId, u32>,
}

impl VersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a persisted snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut versions = snapshot.versions;
        for list in versions.values_mut() {
            list.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        }
        Self {
            versions,
            last_autosave_time: snapshot.last_autosave_time,
            edits_since_save: AHashMap::new(),
        }
    }

    /// Captures the two persisted fields as a snapshot blob.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            versions: self.versions.clone(),
            last_autosave_time: self.last_autosave_time.clone(),
        }
    }

    /// Saves a new version for the workflow. Never fails.
    ///
    /// The graph is deep-copied, the version number is the current per-workflow
    /// maximum plus one (1 for a fresh workflow), the per-workflow edit counter
    /// resets, and autosaves record the last-autosave timestamp.
    pub fn save_version(
        &mut self,
        workflow_id: &str,
        graph: &Graph,
        save_type: SaveType,
        description: Option<String>,
    ) -> Version {
        self.save_version_on_branch(workflow_id, graph, save_type, description, None)
    }

    /// Like [`save_version`](Self::save_version), tagging the version with a
    /// branch id. The tag value is chosen at the call site, typically from
    /// `BranchManager::active_branch`.
    pub fn save_version_on_branch(
        &mut self,
        workflow_id: &str,
        graph: &Graph,
        save_type: SaveType,
        description: Option<String>,
        branch_id: Option<String>,
    ) -> Version {
        let list = self.versions.entry(workflow_id.to_string()).or_default();
        let next_number = list.iter().map(|v| v.version_number).max().unwrap_or(0) + 1;

        let snapshot = graph.clone();
        let size_bytes = serde_json::to_vec(&snapshot)
            .map(|bytes| bytes.len() as u64)
            .unwrap_or(0);
        let now = Utc::now();

        let version = Version {
            id: nanoid!(),
            workflow_id: workflow_id.to_string(),
            version_number: next_number,
            created_at: now,
            save_type,
            description,
            graph_snapshot: snapshot,
            size_bytes,
            is_pinned: false,
            branch_id,
        };

        // Newest first.
        list.insert(0, version.clone());

        self.edits_since_save.insert(workflow_id.to_string(), 0);
        if save_type == SaveType::Autosave {
            self.last_autosave_time.insert(workflow_id.to_string(), now);
        }

        debug!(
            workflow_id,
            version_number = next_number,
            save_type = %save_type,
            size_bytes,
            "saved version"
        );
        version
    }

    /// All versions of the workflow, newest first. Empty for an unknown
    /// workflow.
    pub fn get_versions(&self, workflow_id: &str) -> &[Version] {
        self.versions
            .get(workflow_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Cursor-and-limit pagination over the descending version list.
    pub fn list_versions(
        &self,
        workflow_id: &str,
        cursor: Option<usize>,
        limit: usize,
    ) -> VersionPage {
        let all = self.get_versions(workflow_id);
        let start = cursor.unwrap_or(0).min(all.len());
        let end = start.saturating_add(limit).min(all.len());
        VersionPage {
            versions: all[start..end].to_vec(),
            next_cursor: (end < all.len()).then_some(end),
            total: all.len(),
        }
    }

    /// Looks a version up by its opaque id, across all workflows.
    pub fn get_version(&self, version_id: &str) -> Option<&Version> {
        self.versions
            .values()
            .flatten()
            .find(|v| v.id == version_id)
    }

    /// Looks a version up by workflow and version number.
    pub fn get_version_by_number(&self, workflow_id: &str, number: u32) -> Option<&Version> {
        self.get_versions(workflow_id)
            .iter()
            .find(|v| v.version_number == number)
    }

    /// Removes a version by id. Idempotent: unknown ids are a no-op.
    ///
    /// Deleting the highest-numbered version lets the next save reuse that
    /// number.
    pub fn delete_version(&mut self, version_id: &str) {
        for (workflow_id, list) in self.versions.iter_mut() {
            let before = list.len();
            list.retain(|v| v.id != version_id);
            if list.len() < before {
                debug!(workflow_id = workflow_id.as_str(), version_id, "deleted version");
                return;
            }
        }
    }

    /// Sets or clears the pin flag. No-op when the version does not exist.
    pub fn pin_version(&mut self, version_id: &str, pinned: bool) {
        if let Some(version) = self
            .versions
            .values_mut()
            .flatten()
            .find(|v| v.id == version_id)
        {
            version.is_pinned = pinned;
        }
    }

    /// Prunes the workflow's history with `Utc::now()` as the reference time.
    /// Returns the number of versions removed.
    pub fn prune_old_versions(&mut self, workflow_id: &str, policy: &RetentionPolicy) -> usize {
        self.prune_old_versions_at(workflow_id, policy, Utc::now())
    }

    /// Prunes against an explicit reference time.
    ///
    /// The workflow's version list is replaced as one unit; callers never
    /// observe a partially pruned list.
    pub fn prune_old_versions_at(
        &mut self,
        workflow_id: &str,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> usize {
        let Some(list) = self.versions.get_mut(workflow_id) else {
            return 0;
        };
        let before = list.len();
        let kept = policy.apply(std::mem::take(list), now);
        *list = kept;
        let removed = before - list.len();
        if removed > 0 {
            debug!(workflow_id, removed, remaining = list.len(), "pruned versions");
        }
        removed
    }

    /// Counts an edit made since the last save of the workflow.
    pub fn record_edit(&mut self, workflow_id: &str) {
        *self
            .edits_since_save
            .entry(workflow_id.to_string())
            .or_insert(0) += 1;
    }

    /// Edits made since the last save; 0 for an unknown workflow.
    pub fn edits_since_save(&self, workflow_id: &str) -> u32 {
        self.edits_since_save.get(workflow_id).copied().unwrap_or(0)
    }

    /// Timestamp of the workflow's most recent autosave, if any.
    pub fn last_autosave_time(&self, workflow_id: &str) -> Option<DateTime<Utc>> {
        self.last_autosave_time.get(workflow_id).copied()
    }

    /// All workflow ids with at least one stored version, sorted.
    pub fn workflow_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .versions
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Pure autosave eligibility gate consumed by the scheduling collaborator.
///
/// A workflow qualifies only when autosave is enabled, a workflow is open,
/// the editor has unsaved edits, and the graph has content. Scheduling
/// (timers, debounce, cancellation on becoming clean) lives outside the core.
pub fn is_eligible_for_autosave(
    enabled: bool,
    workflow_id: Option<&str>,
    is_dirty: bool,
    graph_non_empty: bool,
) -> bool {
    enabled && workflow_id.is_some_and(|id| !id.is_empty()) && is_dirty && graph_non_empty
}
