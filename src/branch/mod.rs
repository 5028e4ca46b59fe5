//! Named branches forked from a base version number.

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::WorkflowId;

/// Opaque generated identifier of a branch.
pub type BranchId = String;

/// A named lineage of versions rooted at a base version number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub workflow_id: WorkflowId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The version number this branch forked from.
    pub base_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_branch_id: Option<BranchId>,
    pub created_at: DateTime<Utc>,
}

/// Creates, switches, and deletes branches.
///
/// Deleting a branch removes only the branch record: versions tagged with the
/// deleted branch id are neither deleted nor reparented. Tagging itself sits
/// at the save call site, which reads [`active_branch`](Self::active_branch)
/// and passes the id to `VersionStore::save_version_on_branch`.
#[derive(Debug, Default)]
pub struct BranchManager {
    branches: AHashMap<BranchId, Branch>,
    active: AHashMap<WorkflowId, BranchId>,
}

impl BranchManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new branch rooted at `base_version`.
    pub fn create_branch(
        &mut self,
        workflow_id: &str,
        name: &str,
        description: Option<String>,
        base_version: u32,
        parent_branch_id: Option<BranchId>,
    ) -> Branch {
        let branch = Branch {
            id: nanoid!(),
            workflow_id: workflow_id.to_string(),
            name: name.to_string(),
            description,
            base_version,
            parent_branch_id,
            created_at: Utc::now(),
        };
        debug!(workflow_id, name, base_version, branch_id = branch.id.as_str(), "created branch");
        self.branches.insert(branch.id.clone(), branch.clone());
        branch
    }

    /// Marks the branch active for its workflow so subsequent saves can be
    /// tagged with it. Returns false (and changes nothing) for unknown ids.
    pub fn switch_branch(&mut self, branch_id: &str) -> bool {
        match self.branches.get(branch_id) {
            Some(branch) => {
                self.active
                    .insert(branch.workflow_id.clone(), branch.id.clone());
                true
            }
            None => false,
        }
    }

    /// Removes the branch record. Idempotent: unknown ids are a no-op.
    /// Clears the workflow's active slot if it pointed at the deleted branch.
    pub fn delete_branch(&mut self, branch_id: &str) {
        if let Some(branch) = self.branches.remove(branch_id) {
            if self
                .active
                .get(&branch.workflow_id)
                .is_some_and(|active| active == branch_id)
            {
                self.active.remove(&branch.workflow_id);
            }
            debug!(
                workflow_id = branch.workflow_id.as_str(),
                branch_id,
                "deleted branch"
            );
        }
    }

    pub fn get_branch(&self, branch_id: &str) -> Option<&Branch> {
        self.branches.get(branch_id)
    }

    /// The branch currently active for the workflow, if one was switched to.
    pub fn active_branch(&self, workflow_id: &str) -> Option<&Branch> {
        self.active
            .get(workflow_id)
            .and_then(|id| self.branches.get(id))
    }

    /// All branches of the workflow, ordered by creation time.
    pub fn list_branches(&self, workflow_id: &str) -> Vec<&Branch> {
        let mut branches: Vec<&Branch> = self
            .branches
            .values()
            .filter(|b| b.workflow_id == workflow_id)
            .collect();
        branches.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        branches
    }
}
