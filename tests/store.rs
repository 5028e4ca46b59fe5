//! Tests for the version store: numbering, lookup, idempotent mutation,
//! pagination, and the persisted fallback blob.
mod common;
use common::*;
use kiroku::prelude::*;
use serde_json::json;

fn sample_graph() -> Graph {
    graph_of(
        vec![
            node_with_data("a", "core.flow.start", "label", json!("Start")),
            node("b", "core.flow.end"),
        ],
        vec![edge("e1", "a", "b")],
    )
}

#[test]
fn test_version_numbers_are_sequential_from_one() {
    let mut store = VersionStore::new();
    for expected in 1..=5u32 {
        let version = store.save_version("wf", &sample_graph(), SaveType::Manual, None);
        assert_eq!(version.version_number, expected);
    }
}

#[test]
fn test_versions_returned_newest_first() {
    let mut store = VersionStore::new();
    for _ in 0..4 {
        store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    }
    let numbers: Vec<u32> = store
        .get_versions("wf")
        .iter()
        .map(|v| v.version_number)
        .collect();
    assert_eq!(numbers, vec![4, 3, 2, 1]);
}

#[test]
fn test_unknown_workflow_has_empty_history() {
    let store = VersionStore::new();
    assert!(store.get_versions("missing").is_empty());
}

#[test]
fn test_snapshot_is_a_deep_copy() {
    let mut store = VersionStore::new();
    let mut graph = sample_graph();
    let version = store.save_version("wf", &graph, SaveType::Manual, None);

    // Mutating the caller's graph must not affect the stored snapshot.
    graph.nodes.push(node("c", "t"));
    graph.nodes[0]
        .data
        .insert("label".to_string(), json!("Changed"));

    let stored = store.get_version(&version.id).unwrap();
    assert_eq!(stored.graph_snapshot.node_count(), 2);
    assert_eq!(
        stored.graph_snapshot.nodes[0].data.get("label"),
        Some(&json!("Start"))
    );
}

#[test]
fn test_size_bytes_matches_canonical_serialization() {
    let mut store = VersionStore::new();
    let graph = sample_graph();
    let version = store.save_version("wf", &graph, SaveType::Manual, None);
    let expected = serde_json::to_vec(&version.graph_snapshot).unwrap().len() as u64;
    assert_eq!(version.size_bytes, expected);
}

#[test]
fn test_get_version_searches_across_workflows() {
    let mut store = VersionStore::new();
    store.save_version("wf-1", &sample_graph(), SaveType::Manual, None);
    let target = store.save_version("wf-2", &sample_graph(), SaveType::Checkpoint, None);

    let found = store.get_version(&target.id).unwrap();
    assert_eq!(found.workflow_id, "wf-2");
    assert_eq!(found.save_type, SaveType::Checkpoint);
    assert!(store.get_version("no-such-id").is_none());
}

#[test]
fn test_get_version_by_number() {
    let mut store = VersionStore::new();
    for _ in 0..3 {
        store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    }
    assert_eq!(
        store.get_version_by_number("wf", 2).map(|v| v.version_number),
        Some(2)
    );
    assert!(store.get_version_by_number("wf", 9).is_none());
}

#[test]
fn test_delete_version_is_idempotent() {
    let mut store = VersionStore::new();
    let version = store.save_version("wf", &sample_graph(), SaveType::Manual, None);

    store.delete_version(&version.id);
    assert!(store.get_version(&version.id).is_none());

    // Second delete and unknown ids are silent no-ops.
    store.delete_version(&version.id);
    store.delete_version("never-existed");
}

#[test]
fn test_deleting_head_version_reuses_its_number() {
    // Documents the unresolved numbering gap: the next save recomputes
    // max+1 over the remaining set and can reissue a previous number.
    let mut store = VersionStore::new();
    store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    let head = store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    assert_eq!(head.version_number, 3);

    store.delete_version(&head.id);
    let next = store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    assert_eq!(next.version_number, 3);
}

#[test]
fn test_pin_version_toggles_and_ignores_unknown_ids() {
    let mut store = VersionStore::new();
    let version = store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    assert!(!version.is_pinned);

    store.pin_version(&version.id, true);
    assert!(store.get_version(&version.id).unwrap().is_pinned);

    // Pinning again is idempotent; unpinning clears the flag.
    store.pin_version(&version.id, true);
    assert!(store.get_version(&version.id).unwrap().is_pinned);
    store.pin_version(&version.id, false);
    assert!(!store.get_version(&version.id).unwrap().is_pinned);

    // Unknown id is a no-op, not an error.
    store.pin_version("never-existed", true);
}

#[test]
fn test_autosave_records_last_autosave_time() {
    let mut store = VersionStore::new();
    assert!(store.last_autosave_time("wf").is_none());

    store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    assert!(store.last_autosave_time("wf").is_none());

    let autosave = store.save_version("wf", &sample_graph(), SaveType::Autosave, None);
    assert_eq!(store.last_autosave_time("wf"), Some(autosave.created_at));
}

#[test]
fn test_save_resets_edit_counter() {
    let mut store = VersionStore::new();
    store.record_edit("wf");
    store.record_edit("wf");
    assert_eq!(store.edits_since_save("wf"), 2);

    store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    assert_eq!(store.edits_since_save("wf"), 0);
}

#[test]
fn test_pagination_walks_descending_history() {
    let mut store = VersionStore::new();
    for _ in 0..5 {
        store.save_version("wf", &sample_graph(), SaveType::Manual, None);
    }

    let first = store.list_versions("wf", None, 2);
    assert_eq!(first.total, 5);
    assert_eq!(
        first.versions.iter().map(|v| v.version_number).collect::<Vec<_>>(),
        vec![5, 4]
    );
    assert_eq!(first.next_cursor, Some(2));

    let second = store.list_versions("wf", first.next_cursor, 2);
    assert_eq!(
        second.versions.iter().map(|v| v.version_number).collect::<Vec<_>>(),
        vec![3, 2]
    );

    let last = store.list_versions("wf", second.next_cursor, 2);
    assert_eq!(
        last.versions.iter().map(|v| v.version_number).collect::<Vec<_>>(),
        vec![1]
    );
    assert_eq!(last.next_cursor, None);

    // A cursor past the end yields an empty page, not a panic.
    let overshoot = store.list_versions("wf", Some(99), 2);
    assert!(overshoot.versions.is_empty());
    assert_eq!(overshoot.next_cursor, None);
}

#[test]
fn test_store_snapshot_roundtrip_through_file() {
    let mut store = VersionStore::new();
    store.save_version("wf-1", &sample_graph(), SaveType::Manual, Some("first".into()));
    store.save_version("wf-1", &sample_graph(), SaveType::Autosave, None);
    store.save_version("wf-2", &empty_graph(), SaveType::Checkpoint, None);
    store.record_edit("wf-1");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let path = path.to_str().unwrap();

    store.snapshot().save(path).unwrap();
    let reloaded = VersionStore::from_snapshot(StoreSnapshot::from_file(path).unwrap());

    assert_eq!(reloaded.get_versions("wf-1").len(), 2);
    assert_eq!(reloaded.get_versions("wf-2").len(), 1);
    assert_eq!(
        reloaded.get_versions("wf-1")[1].description.as_deref(),
        Some("first")
    );
    assert_eq!(
        reloaded.last_autosave_time("wf-1"),
        store.last_autosave_time("wf-1")
    );

    // Edit counters are transient session state and are not persisted.
    assert_eq!(reloaded.edits_since_save("wf-1"), 0);
}

#[test]
fn test_snapshot_decode_failure_surfaces_as_error() {
    let result = StoreSnapshot::from_bytes(b"not json at all");
    assert!(matches!(result, Err(PersistError::Decode(_))));

    let result = StoreSnapshot::from_file("/definitely/missing/store.json");
    assert!(matches!(result, Err(PersistError::File { .. })));
}

#[test]
fn test_autosave_eligibility_gate() {
    assert!(is_eligible_for_autosave(true, Some("wf"), true, true));

    assert!(!is_eligible_for_autosave(false, Some("wf"), true, true));
    assert!(!is_eligible_for_autosave(true, None, true, true));
    assert!(!is_eligible_for_autosave(true, Some(""), true, true));
    assert!(!is_eligible_for_autosave(true, Some("wf"), false, true));
    assert!(!is_eligible_for_autosave(true, Some("wf"), true, false));
}

#[test]
fn test_workflow_ids_lists_populated_workflows() {
    let mut store = VersionStore::new();
    store.save_version("beta", &sample_graph(), SaveType::Manual, None);
    store.save_version("alpha", &sample_graph(), SaveType::Manual, None);
    assert_eq!(store.workflow_ids(), vec!["alpha", "beta"]);
}
