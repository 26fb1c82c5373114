// Workflow controller - single-document command dispatch
//
// The controller owns nothing but seams: the project slot lives in the
// StateManager, loading and exporting live behind the ExportEngine
// binding, every question to the user goes through the DialogService, and
// rendering goes through the ViewHandle. What the controller does own is
// the workflow policy: one command at a time, cancellation as a
// first-class outcome, the destination conflict rule for Export All, and
// one catch-log-notify boundary for engine failures.

use crate::i18n::Localizer;
use crate::logging::LogBuffer;
use crate::metrics::Metrics;
use crate::models::EngineSettings;
use crate::services::{BindingError, EngineBinding};
use crate::state::StateManager;
use crate::ui::commands::CommandId;
use crate::ui::dialogs::{Confirmation, DialogService, FileFilter};
use crate::ui::view::ViewHandle;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// File name offered by the Save Log dialog.
const LOG_FILE_NAME: &str = "assetbench.log";

const BUNDLE_EXTENSIONS: &[&str] = &["bundle", "pak", "assets"];
const LOG_EXTENSIONS: &[&str] = &["log", "txt"];

/// Tri-state result of a dispatched command.
///
/// A user backing out of a picker or a confirmation is a [`Cancelled`]
/// outcome, never an error: cancellations are not logged as failures and
/// never open a dialog.
///
/// [`Cancelled`]: Outcome::Cancelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    Succeeded(T),
    Cancelled,
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }
}

/// Coordinates commands between state, engine, dialogs and view.
///
/// Every collaborator is injected, so the whole workflow runs under test
/// with scripted dialogs and stub engines.
///
/// # Example
/// ```ignore
/// let controller = Controller::new(
///     state,
///     settings.clone(),
///     EngineBinding::new(engine, &settings)?,
///     Arc::new(NativeDialogs),
///     view,
///     localizer,
///     log_buffer,
///     metrics,
/// )?;
///
/// controller.dispatch(CommandId::LoadFiles).await;
/// ```
pub struct Controller {
    state: Arc<StateManager>,
    settings: EngineSettings,
    binding: RwLock<EngineBinding>,
    dialogs: Arc<dyn DialogService>,
    view: Arc<dyn ViewHandle>,
    localizer: Arc<Localizer>,
    log_buffer: LogBuffer,
    metrics: Arc<Metrics>,
    /// Set while a command is in flight; dispatch is not re-entrant.
    busy: AtomicBool,
}

/// Clears the busy flag when the in-flight command ends, on every path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Controller {
    /// Build a controller around a validated engine binding.
    ///
    /// # Errors
    /// [`BindingError::ConfigurationMismatch`] when the binding was
    /// validated against settings that differ from `settings`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: Arc<StateManager>,
        settings: EngineSettings,
        binding: EngineBinding,
        dialogs: Arc<dyn DialogService>,
        view: Arc<dyn ViewHandle>,
        localizer: Arc<Localizer>,
        log_buffer: LogBuffer,
        metrics: Arc<Metrics>,
    ) -> Result<Self, BindingError> {
        if binding.settings() != &settings {
            return Err(BindingError::ConfigurationMismatch);
        }
        Ok(Self {
            state,
            settings,
            binding: RwLock::new(binding),
            dialogs,
            view,
            localizer,
            log_buffer,
            metrics,
            busy: AtomicBool::new(false),
        })
    }

    /// Replace the engine binding.
    ///
    /// # Errors
    /// [`BindingError::ConfigurationMismatch`] when the new binding does not
    /// match the controller's settings; the previous binding stays
    /// installed.
    pub fn install_binding(&self, binding: EngineBinding) -> Result<(), BindingError> {
        if binding.settings() != &self.settings {
            return Err(BindingError::ConfigurationMismatch);
        }
        *self.binding.write().unwrap() = binding;
        tracing::info!("Engine binding replaced");
        Ok(())
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run one command to completion.
    ///
    /// While a command is in flight every further dispatch fails fast with
    /// no dialog and no state change; the rejection is only visible in the
    /// returned outcome and a debug log line.
    pub async fn dispatch(&self, command: CommandId) -> Outcome {
        let Some(_busy) = self.try_begin() else {
            self.metrics.record_rejected_busy();
            tracing::debug!("Rejected {:?}: another command is still running", command);
            return Outcome::Failed("a command is already running".to_string());
        };
        self.metrics.record_dispatched();
        tracing::info!("Dispatching {:?}", command);

        let outcome = match &command {
            CommandId::LoadFiles => self.load_files().await,
            CommandId::LoadFolders => self.load_folders().await,
            CommandId::Reset => self.reset(),
            CommandId::ExportAll => self.export_all().await,
            CommandId::SaveLog => self.save_log().await,
            CommandId::SetLanguage(code) => self.set_language(code),
        };

        match &outcome {
            Outcome::Succeeded(()) => {}
            Outcome::Cancelled => {
                self.metrics.record_cancelled();
                tracing::debug!("{:?} cancelled by user", command);
            }
            Outcome::Failed(reason) => {
                self.metrics.record_failed();
                tracing::debug!("{:?} failed: {}", command, reason);
            }
        }
        outcome
    }

    fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| BusyGuard(&self.busy))
    }

    fn binding(&self) -> EngineBinding {
        self.binding.read().unwrap().clone()
    }

    // ===== Command Handlers =====

    async fn load_files(&self) -> Outcome {
        let filter = FileFilter::new(self.localizer.tr("filter.bundles"), BUNDLE_EXTENSIONS);
        let paths = self
            .dialogs
            .pick_files(&self.localizer.tr("picker.load_files_title"), filter)
            .await;
        self.load_selection(paths).await
    }

    async fn load_folders(&self) -> Outcome {
        let paths = self
            .dialogs
            .pick_folders(&self.localizer.tr("picker.load_folders_title"))
            .await;
        self.load_selection(paths).await
    }

    /// Shared tail of both load commands: an empty selection is a silent
    /// cancel, a successful load replaces the project wholesale, and a
    /// failed load leaves the slot empty rather than half-filled.
    async fn load_selection(&self, paths: Vec<Utf8PathBuf>) -> Outcome {
        if paths.is_empty() {
            return Outcome::Cancelled;
        }
        tracing::info!("Loading {} selected paths", paths.len());

        let engine = self.binding().engine();
        match engine.load_and_process(paths).await {
            Ok(project) => {
                tracing::info!("Loaded {}", project.summary());
                self.state.install_project(Arc::new(project));
                self.metrics.record_project_loaded();
                self.view.refresh();
                Outcome::Succeeded(())
            }
            Err(error) => {
                self.state.clear_project();
                let outcome = self.fail_with_dialog("Load failed", error).await;
                self.view.refresh();
                outcome
            }
        }
    }

    /// Clear the project slot. Idempotent; an already-empty workspace is
    /// not an error.
    fn reset(&self) -> Outcome {
        self.state.clear_project();
        self.view.refresh();
        Outcome::Succeeded(())
    }

    /// Export All: validate, pick a destination, settle the conflict rule,
    /// then hand the project to the engine.
    async fn export_all(&self) -> Outcome {
        // Precondition order is part of the contract: loaded check first,
        // then destination selection, then the conflict rule.
        if !self.state.is_loaded() {
            return self.validation_failure("error.not_loaded").await;
        }

        let destination = match self.pick_destination().await {
            Outcome::Succeeded(destination) => destination,
            Outcome::Cancelled => return Outcome::Cancelled,
            Outcome::Failed(reason) => return Outcome::Failed(reason),
        };
        match self.resolve_destination_conflict(&destination).await {
            Outcome::Succeeded(()) => {}
            Outcome::Cancelled => return Outcome::Cancelled,
            Outcome::Failed(reason) => return Outcome::Failed(reason),
        }

        let project = match self.state.current_project() {
            Ok(project) => project,
            Err(_) => return self.validation_failure("error.not_loaded").await,
        };

        self.state.begin_export(destination.clone());
        let engine = self.binding().engine();
        let started = Instant::now();
        match engine.export(Arc::clone(&project), destination.clone()).await {
            Ok(report) => {
                self.state.finish_export(true);
                self.metrics
                    .record_export_completed(report.files_written, started.elapsed());
                tracing::info!(
                    "Export finished: {} files ({} bytes) to {}",
                    report.files_written,
                    report.bytes_written,
                    destination
                );
                self.view.refresh();
                Outcome::Succeeded(())
            }
            Err(error) => {
                self.state.finish_export(false);
                self.metrics.record_export_failed();
                // The failed attempt may have left staging files behind;
                // the project itself stays loaded for a retry.
                engine.release_temporaries(Arc::clone(&project)).await;
                let outcome = self.fail_with_dialog("Export failed", error).await;
                self.view.refresh();
                outcome
            }
        }
    }

    /// Destination selection for Export All: exactly one existing
    /// directory.
    async fn pick_destination(&self) -> Outcome<Utf8PathBuf> {
        let mut picked = self
            .dialogs
            .pick_folders(&self.localizer.tr("picker.export_title"))
            .await;
        if picked.is_empty() {
            return Outcome::Cancelled;
        }
        if picked.len() > 1 {
            return self.validation_failure("error.multi_destination").await;
        }
        let destination = picked.remove(0);
        if !destination.is_dir() {
            return self.validation_failure("error.dest_not_directory").await;
        }
        Outcome::Succeeded(destination)
    }

    /// Destination conflict rule: writing into a non-empty directory needs
    /// an explicit confirmation, and only then are the existing contents
    /// removed (the directory itself stays). Anything short of a yes leaves
    /// the destination untouched.
    async fn resolve_destination_conflict(&self, destination: &Utf8Path) -> Outcome {
        let occupied = match directory_occupied(destination).await {
            Ok(occupied) => occupied,
            Err(error) => {
                return self
                    .fail_with_dialog("Failed to inspect destination", error)
                    .await;
            }
        };
        if !occupied {
            return Outcome::Succeeded(());
        }

        let answer = self
            .dialogs
            .confirm(
                &self.localizer.tr("dialog.export_title"),
                &self.localizer.tr("confirm.dir_not_empty"),
            )
            .await;
        if answer != Confirmation::Yes {
            tracing::debug!("Export aborted, {} left untouched", destination);
            return Outcome::Cancelled;
        }

        tracing::info!("Clearing confirmed destination {}", destination);
        if let Err(error) = clear_directory(destination).await {
            return self
                .fail_with_dialog("Failed to clear destination", error)
                .await;
        }
        Outcome::Succeeded(())
    }

    /// Write the in-memory session log where the user points. Overwrites
    /// silently: a single file the user just named, unlike the
    /// whole-directory conflict rule in Export All.
    async fn save_log(&self) -> Outcome {
        let filter = FileFilter::new(self.localizer.tr("filter.logs"), LOG_EXTENSIONS);
        let Some(path) = self
            .dialogs
            .pick_save_file(
                &self.localizer.tr("picker.save_log_title"),
                LOG_FILE_NAME,
                filter,
            )
            .await
        else {
            return Outcome::Cancelled;
        };

        match tokio::fs::write(&path, self.log_buffer.contents()).await {
            Ok(()) => {
                tracing::info!("Session log saved to {}", path);
                Outcome::Succeeded(())
            }
            Err(error) => self.fail_with_dialog("Failed to save log", error).await,
        }
    }

    /// Switch the active language and rebuild the whole view. A missing
    /// locale table is a collaborator defect, not a user mistake: logged,
    /// no dialog, view left as-is.
    fn set_language(&self, code: &str) -> Outcome {
        match self.localizer.activate(code) {
            Ok(()) => {
                tracing::info!("Language switched to {}", code);
                self.view.reload();
                Outcome::Succeeded(())
            }
            Err(error) => {
                tracing::error!("Language activation failed: {}", error);
                Outcome::Failed(error.to_string())
            }
        }
    }

    // ===== Failure Boundaries =====

    /// Expected user-correctable rejections: one dialog, a debug line, no
    /// state change and no error-level log entry.
    async fn validation_failure<T>(&self, message_key: &str) -> Outcome<T> {
        let message = self.localizer.tr(message_key);
        tracing::debug!("Validation failed: {}", message);
        self.dialogs
            .notify_error(&self.localizer.tr("dialog.error_title"), &message)
            .await;
        Outcome::Failed(message)
    }

    /// Everything unexpected shares one boundary: full detail to the log,
    /// a single blocking dialog, a failed outcome.
    async fn fail_with_dialog<T, E>(&self, context: &str, error: E) -> Outcome<T>
    where
        E: fmt::Debug + fmt::Display,
    {
        tracing::error!("{}: {:?}", context, error);
        self.dialogs
            .notify_error(&self.localizer.tr("dialog.error_title"), &error.to_string())
            .await;
        Outcome::Failed(error.to_string())
    }
}

/// True if `dir` contains at least one entry.
async fn directory_occupied(dir: &Utf8Path) -> io::Result<bool> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    Ok(entries.next_entry().await?.is_some())
}

/// Remove everything inside `dir`, keeping the directory itself.
async fn clear_directory(dir: &Utf8Path) -> io::Result<()> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }
    }
    Ok(())
}
