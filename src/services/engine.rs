// Export engine contract
//
// The controller consumes the asset engine through this seam: load a
// selection into a Project, export a Project into a destination directory,
// and release any staging temporaries an export attempt left behind.
// EngineBinding ties an engine instance to the controller's configuration
// before it may be installed.

use crate::models::{EngineSettings, Project};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors from the load-and-process operation.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("selected path does not exist: {0}")]
    SourceMissing(Utf8PathBuf),

    #[error("selection produced no loadable assets")]
    NothingToLoad,

    #[error("failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        source: io::Error,
    },

    /// Engine-specific processing failure, already humanized.
    #[error("{0}")]
    Engine(String),
}

/// Errors from the export operation.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to stage {path}: {source}")]
    Staging {
        path: Utf8PathBuf,
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        source: io::Error,
    },

    /// Engine-specific export failure, already humanized.
    #[error("{0}")]
    Engine(String),
}

/// Binding validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The engine was constructed against settings that do not compare equal
    /// to the controller's configuration. A programming error rather than a
    /// runtime condition: nothing is installed.
    #[error("engine settings do not match the controller configuration")]
    ConfigurationMismatch,
}

/// Summary of a completed export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub files_written: usize,
    pub bytes_written: u64,
}

/// The asset engine seam consumed by the controller.
///
/// Implementations are stateless services over a settings snapshot; the
/// in-memory [`Project`] is the only state that travels between calls. The
/// built-in implementation is [`crate::services::BundleEngine`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExportEngine: Send + Sync {
    /// The settings this engine instance was constructed against.
    fn settings(&self) -> &EngineSettings;

    /// Collect the selected files and folders into a new [`Project`].
    async fn load_and_process(&self, paths: Vec<Utf8PathBuf>) -> Result<Project, LoadError>;

    /// Write every asset of `project` under `destination`.
    async fn export(
        &self,
        project: Arc<Project>,
        destination: Utf8PathBuf,
    ) -> Result<ExportReport, ExportError>;

    /// Remove staging temporaries left behind by an export attempt.
    /// Idempotent and infallible: failures are logged, never propagated.
    async fn release_temporaries(&self, project: Arc<Project>);
}

/// A validated engine handle.
///
/// Construction compares the engine's settings with the controller's
/// configuration by value; a mismatched engine is rejected before anything
/// is installed. Cloning shares the engine instance.
#[derive(Clone)]
pub struct EngineBinding {
    engine: Arc<dyn ExportEngine>,
    settings: EngineSettings,
}

impl EngineBinding {
    /// Validate `engine` against `configuration` and wrap it.
    ///
    /// # Errors
    /// [`BindingError::ConfigurationMismatch`] when the engine's settings do
    /// not compare equal to `configuration`.
    pub fn new(
        engine: Arc<dyn ExportEngine>,
        configuration: &EngineSettings,
    ) -> Result<Self, BindingError> {
        if engine.settings() != configuration {
            return Err(BindingError::ConfigurationMismatch);
        }
        Ok(Self {
            settings: configuration.clone(),
            engine,
        })
    }

    /// Shared handle to the bound engine.
    pub fn engine(&self) -> Arc<dyn ExportEngine> {
        Arc::clone(&self.engine)
    }

    /// The configuration this binding was validated against.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settings() -> EngineSettings {
        EngineSettings {
            scratch_root: Utf8PathBuf::from("scratch"),
            skip_hidden: true,
            preserve_structure: true,
        }
    }

    #[test]
    fn test_binding_accepts_matching_settings() {
        let config = sample_settings();
        let mut engine = MockExportEngine::new();
        engine.expect_settings().return_const(config.clone());

        let binding = EngineBinding::new(Arc::new(engine), &config).unwrap();
        assert_eq!(binding.settings(), &config);
    }

    #[test]
    fn test_binding_rejects_mismatched_settings() {
        let config = sample_settings();
        let mut other = config.clone();
        other.skip_hidden = !other.skip_hidden;

        let mut engine = MockExportEngine::new();
        engine.expect_settings().return_const(other);

        let result = EngineBinding::new(Arc::new(engine), &config);
        assert!(matches!(result, Err(BindingError::ConfigurationMismatch)));
    }

    #[test]
    fn test_binding_clone_shares_engine() {
        let config = sample_settings();
        let mut engine = MockExportEngine::new();
        engine.expect_settings().return_const(config.clone());

        let binding = EngineBinding::new(Arc::new(engine), &config).unwrap();
        let clone = binding.clone();

        assert!(Arc::ptr_eq(&binding.engine(), &clone.engine()));
        assert_eq!(binding.settings(), clone.settings());
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        let missing = LoadError::SourceMissing(Utf8PathBuf::from("/data/a.bundle"));
        assert_eq!(
            missing.to_string(),
            "selected path does not exist: /data/a.bundle"
        );

        let engine = ExportError::Engine("disk full".to_string());
        assert_eq!(engine.to_string(), "disk full");
    }
}
