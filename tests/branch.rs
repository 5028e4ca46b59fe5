//! Tests for branch creation, switching, deletion, and version tagging.
mod common;
use common::*;
use kiroku::prelude::*;

#[test]
fn test_create_branch_records_metadata() {
    let mut branches = BranchManager::new();
    let branch = branches.create_branch(
        "wf",
        "experiment",
        Some("Trying a new layout".to_string()),
        3,
        None,
    );

    assert_eq!(branch.workflow_id, "wf");
    assert_eq!(branch.name, "experiment");
    assert_eq!(branch.base_version, 3);
    assert!(branch.parent_branch_id.is_none());

    let found = branches.get_branch(&branch.id).unwrap();
    assert_eq!(found.description.as_deref(), Some("Trying a new layout"));
}

#[test]
fn test_switch_branch_marks_active_per_workflow() {
    let mut branches = BranchManager::new();
    let a = branches.create_branch("wf", "a", None, 1, None);
    let b = branches.create_branch("wf", "b", None, 2, None);

    assert!(branches.active_branch("wf").is_none());
    assert!(branches.switch_branch(&a.id));
    assert_eq!(branches.active_branch("wf").map(|b| b.id.clone()), Some(a.id));

    assert!(branches.switch_branch(&b.id));
    assert_eq!(
        branches.active_branch("wf").map(|b| b.id.clone()),
        Some(b.id)
    );

    // Switching to an unknown branch changes nothing.
    assert!(!branches.switch_branch("no-such-branch"));
    assert!(branches.active_branch("wf").is_some());
}

#[test]
fn test_delete_branch_is_idempotent_and_clears_active_slot() {
    let mut branches = BranchManager::new();
    let branch = branches.create_branch("wf", "scratch", None, 1, None);
    branches.switch_branch(&branch.id);

    branches.delete_branch(&branch.id);
    assert!(branches.get_branch(&branch.id).is_none());
    assert!(branches.active_branch("wf").is_none());

    // Deleting again or deleting unknown ids is a no-op.
    branches.delete_branch(&branch.id);
    branches.delete_branch("never-existed");
}

#[test]
fn test_deleting_branch_leaves_tagged_versions_orphaned() {
    let mut store = VersionStore::new();
    let mut branches = BranchManager::new();

    let branch = branches.create_branch("wf", "side", None, 1, None);
    branches.switch_branch(&branch.id);

    let tagged = store.save_version_on_branch(
        "wf",
        &empty_graph(),
        SaveType::Manual,
        None,
        branches.active_branch("wf").map(|b| b.id.clone()),
    );
    assert_eq!(tagged.branch_id.as_deref(), Some(branch.id.as_str()));

    // Branch deletion never touches the version records; the tag stays.
    branches.delete_branch(&branch.id);
    let survivor = store.get_version(&tagged.id).unwrap();
    assert_eq!(survivor.branch_id.as_deref(), Some(branch.id.as_str()));
}

#[test]
fn test_child_branches_track_their_parent() {
    let mut branches = BranchManager::new();
    let parent = branches.create_branch("wf", "main-line", None, 1, None);
    let child = branches.create_branch("wf", "offshoot", None, 4, Some(parent.id.clone()));

    assert_eq!(child.parent_branch_id.as_deref(), Some(parent.id.as_str()));
}

#[test]
fn test_list_branches_is_scoped_to_the_workflow() {
    let mut branches = BranchManager::new();
    branches.create_branch("wf-1", "one", None, 1, None);
    branches.create_branch("wf-2", "other", None, 1, None);
    branches.create_branch("wf-1", "two", None, 2, None);

    let listed = branches.list_branches("wf-1");
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|b| b.workflow_id == "wf-1"));
}
