//! Services module - Pure business logic for loading and exporting assets.
//!
//! This module contains the engine side of the workbench. The services are
//! **framework-agnostic** and have no dependencies on the UI layer, making
//! them testable and reusable.
//!
//! # Components
//!
//! - [`ExportEngine`]: The seam between the controller and whatever turns a
//!   selection into a [`crate::models::Project`] and a project into files on
//!   disk. Implementations are stateless services over an
//!   [`crate::models::EngineSettings`] snapshot.
//!
//! - [`EngineBinding`]: A validated handle around an engine instance. A
//!   binding can only be constructed when the engine's settings compare
//!   equal to the configuration it is bound against; nothing is ever
//!   partially installed.
//!
//! - [`BundleEngine`]: The built-in implementation. Walks selected files and
//!   folders into asset entries, and exports them through a staging
//!   directory under the configured scratch root.
//!
//! # Design Philosophy
//!
//! The services layer is designed to be:
//! - **Pure**: No side effects beyond file I/O
//! - **Async**: All operations use tokio for non-blocking I/O
//! - **Testable**: No hidden dependencies, all inputs are explicit parameters
//! - **Framework-agnostic**: No dialogs, no rendering, only business logic
//!
//! # Usage Example
//!
//! ```ignore
//! use assetbench::services::{BundleEngine, EngineBinding, ExportEngine};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(BundleEngine::new(settings.clone()));
//! let binding = EngineBinding::new(engine, &settings)?;
//!
//! let project = binding.engine().load_and_process(selection).await?;
//! let report = binding
//!     .engine()
//!     .export(Arc::new(project), destination)
//!     .await?;
//! ```

pub mod bundle;
pub mod engine;

pub use bundle::BundleEngine;
pub use engine::{
    BindingError, EngineBinding, ExportEngine, ExportError, ExportReport, LoadError,
};
