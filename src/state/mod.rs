// State management module
//
// This module provides the StateManager which wraps WorkspaceState with
// thread-safe access using Arc<RwLock<T>> and emits change events for
// frontend updates.

use crate::models::Project;
use camino::Utf8PathBuf;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;

/// Error returned when a reader expects a loaded project and finds none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no project is loaded")]
pub struct NotLoaded;

/// Change events emitted when state is modified
///
/// These events are emitted to notify interested parties (primarily the
/// frontend) about state changes without requiring them to poll the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A project was installed into the slot (fresh load or replacement)
    ProjectLoaded { assets: usize },

    /// The project slot was cleared
    ProjectCleared,

    /// An export run has started
    ExportStarted { destination: Utf8PathBuf },

    /// An export run has finished
    ExportFinished { success: bool },
}

/// Snapshot of everything the controller tracks between commands.
///
/// The project slot is the load/export state machine: `None` means nothing
/// is loaded, `Some` means a project is loaded, and `is_exporting` marks
/// the export leg. The loaded flag is derived from the slot and stored
/// nowhere else.
#[derive(Clone, Debug, Default)]
pub struct WorkspaceState {
    /// The single currently-loaded project, replaced wholesale on load
    pub project: Option<Arc<Project>>,

    /// True while an export run is in flight
    pub is_exporting: bool,

    /// Destination of the export currently in flight
    pub export_destination: Option<Utf8PathBuf>,
}

impl WorkspaceState {
    /// True iff a project is present in the slot.
    pub fn is_loaded(&self) -> bool {
        self.project.is_some()
    }

    /// Cheap handle to the loaded project.
    pub fn current_project(&self) -> Result<Arc<Project>, NotLoaded> {
        self.project.clone().ok_or(NotLoaded)
    }
}

/// Thread-safe state manager with event emission
///
/// This is the central state management component that:
/// - Provides thread-safe access to [`WorkspaceState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Supports subscribing to state changes via tokio broadcast channels
///
/// # Usage
///
/// Always use `StateManager` instead of holding the state directly:
/// - [`read()`](Self::read) for reading state without cloning it
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
///
/// # Related Types
///
/// - [`crate::models::Project`]: The payload held by the project slot
/// - [`StateChange`]: Event types emitted on state mutations
/// - [`crate::ui::controller::Controller`]: Primary writer of this state
pub struct StateManager {
    /// The workspace state protected by RwLock for thread-safe access
    state: Arc<RwLock<WorkspaceState>>,

    /// Broadcast channel for emitting state change events
    /// Multiple subscribers can listen for state changes
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with an empty project slot
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(WorkspaceState::default())),
            state_tx,
        }
    }

    /// Get a read-only snapshot of the current state
    ///
    /// This clones the state (the project itself is shared via Arc), so it
    /// is safe to use without holding locks. For checking individual fields,
    /// consider using `read()` with a closure.
    pub fn snapshot(&self) -> WorkspaceState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let loaded = state_manager.read(|state| state.is_loaded());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&WorkspaceState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// This is the primary way to modify state. It:
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed
    /// 4. Emits appropriate events
    ///
    /// # Arguments
    /// * `update_fn` - A function that mutates the state
    ///
    /// # Returns
    /// A vector of StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut WorkspaceState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        // Apply the update
        update_fn(&mut state);

        // Detect changes and emit events
        let changes = self.detect_changes(&old_state, &state);

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    ///
    /// Returns a receiver that will get notified of all future state changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Detect what changed between two states and generate events
    ///
    /// This is called internally by `update()` to determine which events to
    /// emit. Replacing one project with another emits `ProjectLoaded` without
    /// an intermediate `ProjectCleared`; the slot never goes through an empty
    /// state on a replacement.
    fn detect_changes(&self, old: &WorkspaceState, new: &WorkspaceState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        let installed = match (&old.project, &new.project) {
            (None, Some(_)) => true,
            (Some(old_project), Some(new_project)) => !Arc::ptr_eq(old_project, new_project),
            _ => false,
        };
        if installed {
            let assets = new
                .project
                .as_ref()
                .map(|project| project.asset_count())
                .unwrap_or(0);
            changes.push(StateChange::ProjectLoaded { assets });
        }

        if old.project.is_some() && new.project.is_none() {
            changes.push(StateChange::ProjectCleared);
        }

        if !old.is_exporting && new.is_exporting {
            changes.push(StateChange::ExportStarted {
                destination: new.export_destination.clone().unwrap_or_default(),
            });
        }

        changes
    }

    // Convenience methods for the command handlers

    /// Install `project` as the loaded one, replacing any previous project
    pub fn install_project(&self, project: Arc<Project>) -> Vec<StateChange> {
        self.update(|state| {
            state.project = Some(Arc::clone(&project));
        })
    }

    /// Clear the project slot
    ///
    /// Idempotent: clearing an already-empty slot emits nothing.
    pub fn clear_project(&self) -> Vec<StateChange> {
        self.update(|state| {
            state.project = None;
            state.is_exporting = false;
            state.export_destination = None;
        })
    }

    /// Mark the start of an export run to `destination`
    pub fn begin_export(&self, destination: Utf8PathBuf) -> Vec<StateChange> {
        self.update(|state| {
            state.is_exporting = true;
            state.export_destination = Some(destination.clone());
        })
    }

    /// Mark the export run as finished
    pub fn finish_export(&self, success: bool) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            state.is_exporting = false;
            state.export_destination = None;
        });

        // Success is not derivable from the state diff, so the finished
        // event is emitted explicitly.
        let finished = StateChange::ExportFinished { success };
        let _ = self.state_tx.send(finished.clone());
        changes.push(finished);

        changes
    }

    /// True iff a project is currently loaded
    pub fn is_loaded(&self) -> bool {
        self.read(|state| state.is_loaded())
    }

    /// Handle to the loaded project, or [`NotLoaded`]
    pub fn current_project(&self) -> Result<Arc<Project>, NotLoaded> {
        self.read(|state| state.current_project())
    }

    /// Get an Arc reference to the state for use in worker tasks
    ///
    /// Use this when you need to share state across threads but want
    /// to minimize cloning. Remember to use read/write locks appropriately.
    pub fn state_arc(&self) -> Arc<RwLock<WorkspaceState>> {
        Arc::clone(&self.state)
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Make StateManager cloneable for sharing across threads
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}
