//! Data models for the workbench.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Project`]/[`AssetEntry`]: the contents of the currently loaded bundle selection
//! - [`UserSettings`]: user preferences loaded from `assetbench settings.yaml`
//! - [`EngineSettings`]: the immutable export-engine configuration derived from them
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Serializable**: settings structs derive `Serialize`/`Deserialize` for YAML persistence
//! - **Cloneable**: the project is wrapped in `Arc` by [`StateManager`](crate::state::StateManager) for thread-safe sharing
//! - **Immutable**: state updates go through StateManager's `update()` method to ensure consistency

pub mod project;
pub mod settings;

pub use project::{AssetEntry, Project};
pub use settings::{EngineSettings, UserSettings, WorkbenchSettings};
