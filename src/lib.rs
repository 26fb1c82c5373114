// Assetbench - Load/Export workbench for game asset bundles
//
// This is the library crate containing the core business logic and data structures.
// The binary crate (main.rs) provides the interactive entry point.

pub mod config;
pub mod i18n;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::SettingsManager;
pub use i18n::Localizer;
pub use logging::LogBuffer;
pub use metrics::Metrics;
pub use models::{AssetEntry, EngineSettings, Project, UserSettings, WorkbenchSettings};
pub use services::{BindingError, BundleEngine, EngineBinding, ExportEngine};
pub use state::{StateChange, StateManager};
pub use ui::{CommandId, Controller, Outcome};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
