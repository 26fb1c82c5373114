//! Assetbench - Load/Export workbench for game asset bundles
//!
//! Main entry point for the interactive application.
//!
//! # Overview
//!
//! This binary crate provides a console menu frontend over the workflow
//! controller. It initializes:
//! - Logging infrastructure (file rotation + in-memory capture + console)
//! - Tokio async runtime (4 worker threads for file I/O)
//! - State management ([`StateManager`])
//! - Settings loading ([`SettingsManager`])
//! - Localization ([`Localizer`] - built-in English plus locale files)
//! - Workflow controller ([`Controller`] - dispatches menu commands)
//!
//! # Execution Flow
//!
//! 1. Load settings from `assetbench data/assetbench settings.yaml`
//! 2. Initialize logging → <log dir>/assetbench.<date>
//! 3. Create tokio runtime with 4 worker threads
//! 4. Load locale tables from `assetbench data/locales/`
//! 5. Build the bundle engine and validate its binding
//! 6. Create the controller (state + engine + native dialogs + console view)
//! 7. Run the menu loop (blocks until quit)
//! 8. Log a metrics summary and shut the runtime down with a 5s timeout
//!
//! # Configuration Files
//!
//! Expected in `assetbench data/`:
//! - `assetbench settings.yaml`: Language, log directory, engine options
//! - `locales/<code>.yaml`: Optional translated menu and dialog strings

use anyhow::Result;
use assetbench::ui::{
    CommandId, Controller, MENU, NativeDialogs, Outcome, ViewHandle, language_entries,
};
use assetbench::{
    APP_NAME, BundleEngine, EngineBinding, EngineSettings, Localizer, Metrics, SettingsManager,
    StateManager, VERSION,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Renders the workspace summary to the terminal.
///
/// The menu loop re-prints labels on every round, so `reload` only has to
/// repeat the summary; the next render picks up the new language.
struct ConsoleView {
    state: Arc<StateManager>,
}

impl ViewHandle for ConsoleView {
    fn refresh(&self) {
        match self.state.current_project() {
            Ok(project) => println!("[workspace] {}", project.summary()),
            Err(_) => println!("[workspace] no project loaded"),
        }
    }

    fn reload(&self) {
        self.refresh();
    }
}

/// Flattened menu in render order: fixed commands first, then one language
/// row per loaded locale.
fn menu_items(localizer: &Localizer) -> Vec<(String, CommandId)> {
    let mut items: Vec<(String, CommandId)> = MENU
        .iter()
        .map(|entry| (localizer.tr(entry.label_key), entry.id.clone()))
        .collect();
    for (id, name) in language_entries(localizer) {
        items.push((format!("{}: {}", localizer.tr("menu.language"), name), id));
    }
    items
}

fn print_menu(items: &[(String, CommandId)], state: &StateManager) {
    println!();
    match state.current_project() {
        Ok(project) => println!("[workspace] {}", project.summary()),
        Err(_) => println!("[workspace] no project loaded"),
    }
    for (index, (label, _)) in items.iter().enumerate() {
        if MENU.get(index).is_some_and(|entry| entry.separator_before) {
            println!("  ----");
        }
        println!("  {}) {}", index + 1, label);
    }
    println!("  q) Quit");
}

/// Read menu selections from stdin and dispatch them until quit or EOF.
async fn run_menu(
    controller: Arc<Controller>,
    localizer: Arc<Localizer>,
    state: Arc<StateManager>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let items = menu_items(&localizer);
        print_menu(&items, &state);

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let choice = line.trim();
        if choice.is_empty() {
            continue;
        }
        if choice.eq_ignore_ascii_case("q") {
            break;
        }

        let selected = choice
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index.wrapping_sub(1)));
        let Some((_, id)) = selected else {
            println!("Not a menu entry: {choice}");
            continue;
        };

        let outcome = controller.dispatch(id.clone()).await;
        if let Outcome::Failed(reason) = outcome {
            println!("! {reason}");
        }
    }
    Ok(())
}

/// Main entry point for the Assetbench application
///
/// This function orchestrates the complete application lifecycle:
/// 1. Settings and logging setup
/// 2. Tokio runtime initialization
/// 3. State, localization and engine wiring
/// 4. Menu loop execution
/// 5. Graceful shutdown
///
/// # Errors
///
/// This function can fail if:
/// - The settings file exists but is invalid YAML
/// - Logging initialization fails (disk space, permissions)
/// - Tokio runtime creation fails (system resources)
/// - The engine binding does not match the configuration
fn main() -> Result<()> {
    // Settings decide where logs go, so they are read before logging starts.
    let settings_manager = SettingsManager::new("assetbench data")?;
    let settings = settings_manager.load_settings()?;
    let workbench = settings.workbench;

    let (_guard, log_buffer) = assetbench::logging::setup_logging_with_console(
        &workbench.log_dir,
        "assetbench",
        workbench.debug_mode,
        true,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::info!(
        "Settings: language={}, scratch={}, skip_hidden={}, preserve_structure={}",
        workbench.language,
        workbench.scratch_dir,
        workbench.skip_hidden,
        workbench.preserve_structure
    );

    // Create tokio runtime for async operations
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(4)
        .thread_name("assetbench-worker")
        .build()?;

    tracing::info!("Tokio runtime initialized with {} worker threads", 4);

    let state_manager = Arc::new(StateManager::new());
    tracing::info!("State manager initialized");

    let localizer = Arc::new(Localizer::with_locale_dir(&settings_manager.locales_dir()));
    if let Err(error) = localizer.activate(&workbench.language) {
        tracing::warn!("Configured language unavailable, staying on English: {}", error);
    }

    // The engine is constructed against the same settings the controller
    // holds; the binding check makes the match explicit.
    let engine_settings = EngineSettings::from_user(&workbench);
    let engine = Arc::new(BundleEngine::new(engine_settings.clone()));
    let binding = EngineBinding::new(engine, &engine_settings)?;

    let metrics = Arc::new(Metrics::new());
    let view = Arc::new(ConsoleView {
        state: Arc::clone(&state_manager),
    });
    let controller = Arc::new(Controller::new(
        Arc::clone(&state_manager),
        engine_settings,
        binding,
        Arc::new(NativeDialogs),
        view,
        Arc::clone(&localizer),
        log_buffer,
        Arc::clone(&metrics),
    )?);

    tracing::info!("Controller initialized, entering menu loop");

    let result = runtime.block_on(run_menu(controller, localizer, state_manager));

    tracing::info!("Menu loop ended, shutting down");
    metrics.log_summary();

    // Shutdown the tokio runtime gracefully
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    tracing::info!("Application shutdown complete");

    result
}
