use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// User configuration from `assetbench settings.yaml`
///
/// Contains the persisted workbench preferences plus the engine block the
/// immutable [`EngineSettings`] is built from once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(rename = "Assetbench_Settings")]
    pub workbench: WorkbenchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbenchSettings {
    #[serde(rename = "Language", default = "default_language")]
    pub language: String,

    #[serde(rename = "Log Directory", default = "default_log_dir")]
    pub log_dir: String,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,

    #[serde(rename = "Scratch Directory", default = "default_scratch_dir")]
    pub scratch_dir: String,

    #[serde(rename = "Skip Hidden Files", default = "default_skip_hidden")]
    pub skip_hidden: bool,

    #[serde(rename = "Preserve Folder Structure", default = "default_preserve_structure")]
    pub preserve_structure: bool,
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            log_dir: default_log_dir(),
            debug_mode: false,
            scratch_dir: default_scratch_dir(),
            skip_hidden: true,
            preserve_structure: true,
        }
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            workbench: WorkbenchSettings::default(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_scratch_dir() -> String {
    "scratch".to_string()
}

fn default_skip_hidden() -> bool {
    true
}

fn default_preserve_structure() -> bool {
    true
}

/// Immutable export-engine configuration.
///
/// Built once at startup from [`WorkbenchSettings`] and owned by the
/// controller for its entire process lifetime. `PartialEq` is what makes
/// engine-binding validation a plain value comparison: a binding may only
/// be installed when its engine was constructed against settings that
/// compare equal to the controller's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Root directory for export staging temporaries.
    pub scratch_root: Utf8PathBuf,

    /// Skip dotfiles when collecting assets from folders.
    pub skip_hidden: bool,

    /// Recreate the source folder layout under the export destination.
    pub preserve_structure: bool,
}

impl EngineSettings {
    /// Build the engine configuration from the persisted user settings.
    pub fn from_user(settings: &WorkbenchSettings) -> Self {
        Self {
            scratch_root: Utf8PathBuf::from(&settings.scratch_dir),
            skip_hidden: settings.skip_hidden,
            preserve_structure: settings.preserve_structure,
        }
    }
}
