// Dialog service - native pickers and message boxes behind a seam
//
// The controller only talks to this trait, so tests can script every
// answer. The production implementation wraps the `rfd` async dialogs.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};

/// Answer to a yes/no confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

/// File type filter for pickers (name, extensions without dots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|ext| (*ext).to_string()).collect(),
        }
    }
}

/// User-facing dialogs consumed by the controller.
///
/// Pickers return an empty selection (or `None`) on cancel; they never
/// fail. Blocking message boxes return once dismissed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DialogService: Send + Sync {
    /// Multi-select file picker.
    async fn pick_files(&self, title: &str, filter: FileFilter) -> Vec<Utf8PathBuf>;

    /// Multi-select folder picker.
    async fn pick_folders(&self, title: &str) -> Vec<Utf8PathBuf>;

    /// Save-file picker, pre-filled with `default_name`.
    async fn pick_save_file(
        &self,
        title: &str,
        default_name: &str,
        filter: FileFilter,
    ) -> Option<Utf8PathBuf>;

    /// Blocking yes/no question.
    async fn confirm(&self, title: &str, message: &str) -> Confirmation;

    /// Blocking error box.
    async fn notify_error(&self, title: &str, message: &str);
}

/// Native dialogs via `rfd`.
pub struct NativeDialogs;

impl NativeDialogs {
    /// Drop non-UTF-8 paths with a logged error instead of failing the
    /// whole selection.
    fn to_utf8(handles: Vec<rfd::FileHandle>) -> Vec<Utf8PathBuf> {
        handles
            .into_iter()
            .filter_map(|handle| {
                Utf8PathBuf::try_from(handle.path().to_path_buf())
                    .map_err(|e| {
                        tracing::error!("Failed to convert path to UTF-8: {}", e);
                        e
                    })
                    .ok()
            })
            .collect()
    }
}

#[async_trait]
impl DialogService for NativeDialogs {
    async fn pick_files(&self, title: &str, filter: FileFilter) -> Vec<Utf8PathBuf> {
        let picked = AsyncFileDialog::new()
            .set_title(title)
            .add_filter(&filter.name, &filter.extensions)
            .pick_files()
            .await;
        picked.map(Self::to_utf8).unwrap_or_default()
    }

    async fn pick_folders(&self, title: &str) -> Vec<Utf8PathBuf> {
        let picked = AsyncFileDialog::new().set_title(title).pick_folders().await;
        picked.map(Self::to_utf8).unwrap_or_default()
    }

    async fn pick_save_file(
        &self,
        title: &str,
        default_name: &str,
        filter: FileFilter,
    ) -> Option<Utf8PathBuf> {
        let picked = AsyncFileDialog::new()
            .set_title(title)
            .set_file_name(default_name)
            .add_filter(&filter.name, &filter.extensions)
            .save_file()
            .await?;
        Utf8PathBuf::try_from(picked.path().to_path_buf())
            .map_err(|e| {
                tracing::error!("Failed to convert path to UTF-8: {}", e);
                e
            })
            .ok()
    }

    async fn confirm(&self, title: &str, message: &str) -> Confirmation {
        let answer = AsyncMessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::YesNo)
            .show()
            .await;
        // Anything short of an explicit yes counts as no.
        match answer {
            MessageDialogResult::Yes => Confirmation::Yes,
            _ => Confirmation::No,
        }
    }

    async fn notify_error(&self, title: &str, message: &str) {
        AsyncMessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show()
            .await;
    }
}
