// Shared fixtures for the integration tests
//
// The mockall mocks only exist inside the crate's unit tests, so these
// tests script the controller's collaborators through small hand-written
// fakes instead: queued dialog answers, counted view calls, and an engine
// whose load and export results are pushed in ahead of each dispatch.

#![allow(dead_code)]

use assetbench::models::{AssetEntry, EngineSettings, Project};
use assetbench::services::{EngineBinding, ExportEngine, ExportError, ExportReport, LoadError};
use assetbench::state::StateManager;
use assetbench::ui::{Confirmation, Controller, DialogService, FileFilter, ViewHandle};
use assetbench::{Localizer, LogBuffer, Metrics};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn utf8(path: &Path) -> Utf8PathBuf {
    Utf8PathBuf::try_from(path.to_path_buf()).unwrap()
}

/// Project with a single synthetic asset named after `tag`.
pub fn tagged_project(tag: &str) -> Project {
    Project {
        assets: vec![AssetEntry {
            name: format!("{tag}.bundle"),
            relative_path: Utf8PathBuf::from(format!("{tag}.bundle")),
            source_path: Utf8PathBuf::from(format!("/data/{tag}.bundle")),
            size: 64,
        }],
        source_roots: vec![Utf8PathBuf::from(format!("/data/{tag}.bundle"))],
        scratch_dir: Utf8PathBuf::from(format!("scratch/{tag}")),
    }
}

/// Dialog fake driven by queued answers.
///
/// Every queue falls back to a safe default when it runs dry: pickers
/// cancel, confirmations answer no. Error notifications are recorded
/// instead of shown.
#[derive(Default)]
pub struct ScriptedDialogs {
    file_picks: Mutex<VecDeque<Vec<Utf8PathBuf>>>,
    folder_picks: Mutex<VecDeque<Vec<Utf8PathBuf>>>,
    save_picks: Mutex<VecDeque<Option<Utf8PathBuf>>>,
    confirmations: Mutex<VecDeque<Confirmation>>,
    errors_shown: Mutex<Vec<String>>,
    confirms_requested: AtomicUsize,
    /// When set, pickers park on this gate until notified. Lets a test
    /// hold one command in flight while it dispatches another.
    picker_gate: Mutex<Option<Arc<Notify>>>,
    pickers_entered: AtomicUsize,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_files(&self, paths: Vec<Utf8PathBuf>) {
        self.file_picks.lock().unwrap().push_back(paths);
    }

    pub fn push_folders(&self, paths: Vec<Utf8PathBuf>) {
        self.folder_picks.lock().unwrap().push_back(paths);
    }

    pub fn push_save(&self, path: Option<Utf8PathBuf>) {
        self.save_picks.lock().unwrap().push_back(path);
    }

    pub fn push_confirmation(&self, answer: Confirmation) {
        self.confirmations.lock().unwrap().push_back(answer);
    }

    /// Park every subsequent picker until the returned gate is notified.
    pub fn hold_pickers(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.picker_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors_shown.lock().unwrap().clone()
    }

    pub fn confirm_count(&self) -> usize {
        self.confirms_requested.load(Ordering::SeqCst)
    }

    pub fn pickers_entered(&self) -> usize {
        self.pickers_entered.load(Ordering::SeqCst)
    }

    async fn enter_picker(&self) {
        self.pickers_entered.fetch_add(1, Ordering::SeqCst);
        // Clone the gate out so no guard is held across the await.
        let gate = self.picker_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl DialogService for ScriptedDialogs {
    async fn pick_files(&self, _title: &str, _filter: FileFilter) -> Vec<Utf8PathBuf> {
        self.enter_picker().await;
        self.file_picks.lock().unwrap().pop_front().unwrap_or_default()
    }

    async fn pick_folders(&self, _title: &str) -> Vec<Utf8PathBuf> {
        self.enter_picker().await;
        self.folder_picks.lock().unwrap().pop_front().unwrap_or_default()
    }

    async fn pick_save_file(
        &self,
        _title: &str,
        _default_name: &str,
        _filter: FileFilter,
    ) -> Option<Utf8PathBuf> {
        self.enter_picker().await;
        self.save_picks.lock().unwrap().pop_front().flatten()
    }

    async fn confirm(&self, _title: &str, _message: &str) -> Confirmation {
        self.confirms_requested.fetch_add(1, Ordering::SeqCst);
        self.confirmations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Confirmation::No)
    }

    async fn notify_error(&self, _title: &str, message: &str) {
        self.errors_shown.lock().unwrap().push(message.to_string());
    }
}

/// View fake counting refresh and reload calls.
#[derive(Default)]
pub struct RecordingView {
    refreshes: AtomicUsize,
    reloads: AtomicUsize,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl ViewHandle for RecordingView {
    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

/// One recorded export call: the destination handed to the engine and the
/// entry names present inside it at that moment.
#[derive(Debug, Clone)]
pub struct ExportCall {
    pub destination: Utf8PathBuf,
    pub entries_at_call: Vec<String>,
}

/// Engine fake with scripted load and export results.
///
/// Load defaults to a fresh one-asset project and export to a small
/// success report, so only the interesting step of a test needs scripting.
pub struct StubEngine {
    settings: EngineSettings,
    load_results: Mutex<VecDeque<Result<Project, LoadError>>>,
    export_results: Mutex<VecDeque<Result<ExportReport, ExportError>>>,
    export_calls: Mutex<Vec<ExportCall>>,
    released: AtomicUsize,
}

impl StubEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            load_results: Mutex::new(VecDeque::new()),
            export_results: Mutex::new(VecDeque::new()),
            export_calls: Mutex::new(Vec::new()),
            released: AtomicUsize::new(0),
        }
    }

    pub fn push_load(&self, result: Result<Project, LoadError>) {
        self.load_results.lock().unwrap().push_back(result);
    }

    pub fn push_export(&self, result: Result<ExportReport, ExportError>) {
        self.export_results.lock().unwrap().push_back(result);
    }

    pub fn export_calls(&self) -> Vec<ExportCall> {
        self.export_calls.lock().unwrap().clone()
    }

    pub fn release_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    fn entry_names(dir: &Utf8PathBuf) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ExportEngine for StubEngine {
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    async fn load_and_process(&self, _paths: Vec<Utf8PathBuf>) -> Result<Project, LoadError> {
        self.load_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(tagged_project("loaded")))
    }

    async fn export(
        &self,
        _project: Arc<Project>,
        destination: Utf8PathBuf,
    ) -> Result<ExportReport, ExportError> {
        let entries_at_call = Self::entry_names(&destination);
        self.export_calls.lock().unwrap().push(ExportCall {
            destination,
            entries_at_call,
        });
        self.export_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ExportReport {
                files_written: 1,
                bytes_written: 64,
            }))
    }

    async fn release_temporaries(&self, _project: Arc<Project>) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// A controller wired to fakes, with handles to every collaborator so
/// tests can script answers and inspect what happened.
pub struct Harness {
    pub controller: Arc<Controller>,
    pub state: Arc<StateManager>,
    pub engine: Arc<StubEngine>,
    pub dialogs: Arc<ScriptedDialogs>,
    pub view: Arc<RecordingView>,
    pub localizer: Arc<Localizer>,
    pub metrics: Arc<Metrics>,
    pub log_buffer: LogBuffer,
}

pub fn harness() -> Harness {
    let settings = EngineSettings {
        scratch_root: Utf8PathBuf::from("scratch"),
        skip_hidden: true,
        preserve_structure: true,
    };
    let state = Arc::new(StateManager::new());
    let engine = Arc::new(StubEngine::new(settings.clone()));
    let dialogs = Arc::new(ScriptedDialogs::new());
    let view = Arc::new(RecordingView::new());
    let localizer = Arc::new(Localizer::new());
    let metrics = Arc::new(Metrics::new());
    let log_buffer = LogBuffer::new();

    let binding =
        EngineBinding::new(Arc::clone(&engine) as Arc<dyn ExportEngine>, &settings).unwrap();
    let controller = Controller::new(
        Arc::clone(&state),
        settings,
        binding,
        Arc::clone(&dialogs) as Arc<dyn DialogService>,
        Arc::clone(&view) as Arc<dyn ViewHandle>,
        Arc::clone(&localizer),
        log_buffer.clone(),
        Arc::clone(&metrics),
    )
    .unwrap();

    Harness {
        controller: Arc::new(controller),
        state,
        engine,
        dialogs,
        view,
        localizer,
        metrics,
        log_buffer,
    }
}
