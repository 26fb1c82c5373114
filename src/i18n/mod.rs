//! Localization module - language tables and menu label lookup.
//!
//! English ships built in; additional languages are YAML tables in the
//! locale directory, one file per locale code (for example `de.yaml`).
//! Lookup falls back to English and then to the key itself, so a missing
//! entry stays visible instead of blanking the UI.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Locale code of the built-in table.
pub const ENGLISH_CODE: &str = "en";

const ENGLISH_STRINGS: &[(&str, &str)] = &[
    ("menu.load_files", "Load Files..."),
    ("menu.load_folders", "Load Folders..."),
    ("menu.reset", "Reset"),
    ("menu.export_all", "Export All..."),
    ("menu.save_log", "Save Log..."),
    ("menu.language", "Language"),
    ("dialog.error_title", "Error"),
    ("dialog.export_title", "Export All"),
    ("confirm.dir_not_empty", "Directory is not empty. Continue?"),
    ("error.not_loaded", "No files loaded"),
    ("error.multi_destination", "Only one directory can be selected"),
    ("error.dest_not_directory", "The selected path is not a directory"),
    ("picker.load_files_title", "Select Bundle Files"),
    ("picker.load_folders_title", "Select Asset Folders"),
    ("picker.export_title", "Select Export Directory"),
    ("picker.save_log_title", "Save Session Log"),
    ("filter.bundles", "Bundle files"),
    ("filter.logs", "Log files"),
];

/// One language worth of UI strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageTable {
    /// Native display name shown in the language menu.
    #[serde(rename = "Language Name")]
    pub name: String,

    #[serde(rename = "Strings", default)]
    pub strings: IndexMap<String, String>,
}

/// Activation of a locale code with no loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown locale: {0}")]
pub struct UnknownLocale(pub String);

/// Language table registry with one active table.
///
/// Tables keep insertion order, which is also the menu order: built-in
/// English first, then locale files sorted by code. A `locales/en.yaml`
/// replaces the built-in strings without moving English in the menu.
pub struct Localizer {
    tables: IndexMap<String, LanguageTable>,
    active: RwLock<String>,
    code_pattern: Regex,
}

impl Localizer {
    /// Built-in English only.
    pub fn new() -> Self {
        let mut tables = IndexMap::new();
        tables.insert(ENGLISH_CODE.to_string(), builtin_english());
        Self {
            tables,
            active: RwLock::new(ENGLISH_CODE.to_string()),
            code_pattern: Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$")
                .expect("Invalid locale code pattern"),
        }
    }

    /// Built-in English plus every parseable table under `dir`.
    pub fn with_locale_dir(dir: &Utf8Path) -> Self {
        let mut localizer = Self::new();
        localizer.load_locale_dir(dir);
        localizer
    }

    fn load_locale_dir(&mut self, dir: &Utf8Path) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => {
                debug!("No locale directory at {}, using built-in English", dir);
                return;
            }
        };

        let mut files: Vec<Utf8PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| Utf8PathBuf::try_from(entry.path()).ok())
            .filter(|path| path.extension() == Some("yaml"))
            .collect();
        files.sort();

        for path in files {
            let Some(code) = path.file_stem() else {
                continue;
            };
            if !self.code_pattern.is_match(code) {
                warn!("Ignoring locale file with invalid code: {}", path);
                continue;
            }
            match load_table(&path) {
                Ok(table) => {
                    info!("Loaded locale '{}' ({}) from {}", code, table.name, path);
                    self.tables.insert(code.to_string(), table);
                }
                Err(error) => warn!("Failed to load locale file {}: {:#}", path, error),
            }
        }
    }

    /// Locale codes and native names in menu order.
    pub fn available_languages(&self) -> Vec<(String, String)> {
        self.tables
            .iter()
            .map(|(code, table)| (code.clone(), table.name.clone()))
            .collect()
    }

    pub fn active_language(&self) -> String {
        self.active.read().unwrap().clone()
    }

    /// Switch the active table.
    ///
    /// # Errors
    /// [`UnknownLocale`] when no table was loaded for `code`; the active
    /// language is left unchanged.
    pub fn activate(&self, code: &str) -> Result<(), UnknownLocale> {
        if !self.tables.contains_key(code) {
            return Err(UnknownLocale(code.to_string()));
        }
        *self.active.write().unwrap() = code.to_string();
        Ok(())
    }

    /// Look up `key` in the active table, falling back to English and then
    /// to the key itself.
    pub fn tr(&self, key: &str) -> String {
        let active = self.active.read().unwrap();
        if let Some(value) = self
            .tables
            .get(active.as_str())
            .and_then(|table| table.strings.get(key))
        {
            return value.clone();
        }
        self.tables
            .get(ENGLISH_CODE)
            .and_then(|table| table.strings.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_english() -> LanguageTable {
    let mut strings = IndexMap::new();
    for (key, value) in ENGLISH_STRINGS {
        strings.insert((*key).to_string(), (*value).to_string());
    }
    LanguageTable {
        name: "English".to_string(),
        strings,
    }
}

fn load_table(path: &Utf8Path) -> Result<LanguageTable> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read locale file: {path}"))?;
    let table: LanguageTable = serde_yaml_ng::from_str(&contents)
        .with_context(|| format!("Failed to parse locale file: {path}"))?;
    Ok(table)
}
