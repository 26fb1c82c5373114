//! Integration tests for StateManager with state change events
//!
//! These tests verify that the StateManager correctly:
//! - Emits state change events on mutations
//! - Replaces the project slot wholesale without intermediate clears
//! - Supports multiple subscribers
//! - Handles concurrent access from multiple tasks

use assetbench::models::{AssetEntry, Project};
use assetbench::{StateChange, StateManager};
use camino::Utf8PathBuf;
use std::sync::Arc;
use tokio::time::{Duration, timeout};

fn project_with_assets(count: usize) -> Arc<Project> {
    let assets = (0..count)
        .map(|i| AssetEntry {
            name: format!("asset{i}.pak"),
            relative_path: Utf8PathBuf::from(format!("asset{i}.pak")),
            source_path: Utf8PathBuf::from(format!("/data/asset{i}.pak")),
            size: 16,
        })
        .collect();
    Arc::new(Project {
        assets,
        source_roots: vec![Utf8PathBuf::from("/data")],
        scratch_dir: Utf8PathBuf::from("/tmp/assetbench-stage"),
    })
}

#[tokio::test]
async fn test_project_loaded_event_emitted() {
    let state = Arc::new(StateManager::new());
    let mut rx = state.subscribe();

    state.install_project(project_with_assets(2));

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Channel closed");

    assert!(
        matches!(event, StateChange::ProjectLoaded { assets: 2 }),
        "Expected ProjectLoaded event, got: {:?}",
        event
    );
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let state = Arc::new(StateManager::new());
    let mut rx1 = state.subscribe();
    let mut rx2 = state.subscribe();
    let mut rx3 = state.subscribe();

    state.install_project(project_with_assets(5));

    let event1 = timeout(Duration::from_millis(100), rx1.recv())
        .await
        .expect("Timeout on rx1")
        .expect("rx1 closed");

    let event2 = timeout(Duration::from_millis(100), rx2.recv())
        .await
        .expect("Timeout on rx2")
        .expect("rx2 closed");

    let event3 = timeout(Duration::from_millis(100), rx3.recv())
        .await
        .expect("Timeout on rx3")
        .expect("rx3 closed");

    assert!(matches!(event1, StateChange::ProjectLoaded { .. }));
    assert!(matches!(event2, StateChange::ProjectLoaded { .. }));
    assert!(matches!(event3, StateChange::ProjectLoaded { .. }));
}

#[tokio::test]
async fn test_replacement_load_emits_single_loaded_event() {
    let state = Arc::new(StateManager::new());

    state.install_project(project_with_assets(1));

    let mut rx = state.subscribe();
    state.install_project(project_with_assets(3));

    // Replacement is wholesale: one ProjectLoaded, no intermediate
    // ProjectCleared.
    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");
    assert!(
        matches!(event, StateChange::ProjectLoaded { assets: 3 }),
        "Expected ProjectLoaded for the replacement, got: {:?}",
        event
    );

    let extra = timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(extra.is_err(), "Expected no further events, got: {:?}", extra);

    let project = state.current_project().expect("project should be loaded");
    assert_eq!(project.asset_count(), 3);
}

#[tokio::test]
async fn test_clear_project_emits_cleared_once() {
    let state = Arc::new(StateManager::new());
    state.install_project(project_with_assets(1));

    let mut rx = state.subscribe();
    state.clear_project();

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");
    assert!(matches!(event, StateChange::ProjectCleared));

    // Clearing an already-empty slot changes nothing and emits nothing.
    state.clear_project();
    let extra = timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(extra.is_err(), "Expected no event for a no-op clear");

    assert!(!state.is_loaded());
}

#[tokio::test]
async fn test_export_lifecycle_events() {
    let state = Arc::new(StateManager::new());
    state.install_project(project_with_assets(2));

    let mut rx = state.subscribe();

    state.begin_export(Utf8PathBuf::from("/out"));
    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");
    match event {
        StateChange::ExportStarted { destination } => {
            assert_eq!(destination, Utf8PathBuf::from("/out"));
        }
        other => panic!("Expected ExportStarted, got: {:?}", other),
    }
    assert!(state.read(|s| s.is_exporting));

    state.finish_export(true);
    let mut found_finished = false;
    for _ in 0..3 {
        match timeout(Duration::from_millis(100), rx.recv()).await {
            Ok(Ok(StateChange::ExportFinished { success: true })) => {
                found_finished = true;
                break;
            }
            Ok(Ok(_)) => continue,
            _ => break,
        }
    }
    assert!(found_finished, "Should receive ExportFinished event");
    assert!(!state.read(|s| s.is_exporting));

    // The project survives a finished export.
    assert!(state.is_loaded());
}

#[tokio::test]
async fn test_failed_export_keeps_project() {
    let state = Arc::new(StateManager::new());
    state.install_project(project_with_assets(1));

    state.begin_export(Utf8PathBuf::from("/out"));
    state.finish_export(false);

    assert!(state.is_loaded(), "Failed export must retain the project");
    assert!(!state.read(|s| s.is_exporting));
}

#[tokio::test]
async fn test_concurrent_state_access() {
    let state = Arc::new(StateManager::new());

    // Spawn multiple tasks that install projects concurrently
    let mut handles = vec![];

    for i in 1..=10 {
        let state_clone = state.clone();
        let handle = tokio::spawn(async move {
            state_clone.install_project(project_with_assets(i));
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete
    for handle in handles {
        handle.await.unwrap();
    }

    // One of the writes wins; the slot is never left half-filled.
    let project = state.current_project().expect("some project loaded");
    assert!((1..=10).contains(&project.asset_count()));
}

#[tokio::test]
async fn test_snapshot_shares_project_handle() {
    let state = Arc::new(StateManager::new());
    let project = project_with_assets(4);
    state.install_project(Arc::clone(&project));

    let snapshot = state.snapshot();
    let from_snapshot = snapshot.current_project().expect("loaded");
    let from_accessor = state.current_project().expect("loaded");

    assert!(Arc::ptr_eq(&from_snapshot, &project));
    assert!(Arc::ptr_eq(&from_accessor, &project));
}
