// Built-in bundle engine
//
// The default ExportEngine implementation: walks the selected files and
// folders into an in-memory Project, and copies assets into a destination
// directory via a staging area under the configured scratch root.

use crate::models::{AssetEntry, EngineSettings, Project};
use crate::services::engine::{ExportEngine, ExportError, ExportReport, LoadError};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Stateless engine over a settings snapshot.
///
/// Folder walks honor `skip_hidden`; export layout honors
/// `preserve_structure`. Each export stages copies under a fresh directory
/// below `scratch_root` so a failed run never leaves a truncated file at
/// the destination. Duplicate target names are numbered apart rather than
/// overwritten.
pub struct BundleEngine {
    settings: EngineSettings,
    /// Characters that are not portable in file names, replaced with `_`.
    name_pattern: Regex,
    /// Distinguishes scratch directories across loads within one process.
    scratch_seq: AtomicU64,
}

impl BundleEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            name_pattern: Regex::new(r#"[<>:"\\|?*\x00-\x1f]"#)
                .expect("Invalid file name pattern"),
            scratch_seq: AtomicU64::new(0),
        }
    }

    /// Collect every selected file, and every file below every selected
    /// folder, into asset entries sorted by relative path.
    async fn collect_assets(&self, paths: &[Utf8PathBuf]) -> Result<Vec<AssetEntry>, LoadError> {
        let mut assets = Vec::new();
        for selection in paths {
            let metadata =
                tokio::fs::metadata(selection)
                    .await
                    .map_err(|source| match source.kind() {
                        io::ErrorKind::NotFound => LoadError::SourceMissing(selection.clone()),
                        _ => LoadError::Io {
                            path: selection.clone(),
                            source,
                        },
                    })?;

            if metadata.is_dir() {
                self.collect_folder(selection, &mut assets).await?;
            } else if let Some(name) = selection.file_name() {
                assets.push(AssetEntry {
                    name: name.to_string(),
                    relative_path: Utf8PathBuf::from(name),
                    source_path: selection.clone(),
                    size: metadata.len(),
                });
            }
        }

        // Stable manifest order regardless of directory iteration order.
        assets.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        if assets.is_empty() {
            return Err(LoadError::NothingToLoad);
        }
        Ok(assets)
    }

    /// Iterative walk below `root`. Hidden entries (dot-prefixed files and
    /// directories) are only filtered here; explicitly selected files are
    /// always taken.
    async fn collect_folder(
        &self,
        root: &Utf8Path,
        assets: &mut Vec<AssetEntry>,
    ) -> Result<(), LoadError> {
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await.map_err(|source| LoadError::Io {
                path: dir.clone(),
                source,
            })?;

            while let Some(entry) =
                entries.next_entry().await.map_err(|source| LoadError::Io {
                    path: dir.clone(),
                    source,
                })?
            {
                let path = match Utf8PathBuf::try_from(entry.path()) {
                    Ok(path) => path,
                    Err(error) => {
                        warn!("Skipping non-UTF-8 path: {}", error);
                        continue;
                    }
                };
                let Some(name) = path.file_name() else {
                    continue;
                };
                if self.settings.skip_hidden && name.starts_with('.') {
                    debug!("Skipping hidden entry: {}", path);
                    continue;
                }

                let file_type =
                    entry.file_type().await.map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })?;
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }

                let metadata = entry.metadata().await.map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                let relative_path = path
                    .strip_prefix(root)
                    .map(Utf8Path::to_path_buf)
                    .unwrap_or_else(|_| Utf8PathBuf::from(name));
                assets.push(AssetEntry {
                    name: name.to_string(),
                    relative_path,
                    source_path: path,
                    size: metadata.len(),
                });
            }
        }
        Ok(())
    }

    /// Destination path of `asset` relative to the export directory.
    fn target_relative(&self, asset: &AssetEntry) -> Utf8PathBuf {
        if self.settings.preserve_structure {
            let mut clean = Utf8PathBuf::new();
            for component in asset.relative_path.components() {
                clean.push(self.sanitize(component.as_str()));
            }
            clean
        } else {
            let flat = asset
                .relative_path
                .components()
                .map(|component| component.as_str())
                .collect::<Vec<_>>()
                .join("_");
            Utf8PathBuf::from(self.sanitize(&flat))
        }
    }

    fn sanitize(&self, name: &str) -> String {
        self.name_pattern.replace_all(name, "_").into_owned()
    }
}

/// First free variant of `preferred`: the file stem gains a `-2`, `-3`, ...
/// suffix while the name is taken. Like-named files picked from different
/// directories, and flattened layouts where a joined path meets a literal
/// name, would otherwise land on the same destination path.
fn unique_target(preferred: &Utf8Path, taken: &HashSet<Utf8PathBuf>) -> Utf8PathBuf {
    if !taken.contains(preferred) {
        return preferred.to_path_buf();
    }
    let stem = preferred.file_stem().unwrap_or("asset");
    let mut attempt = 2u64;
    loop {
        let name = match preferred.extension() {
            Some(extension) => format!("{stem}-{attempt}.{extension}"),
            None => format!("{stem}-{attempt}"),
        };
        let candidate = match preferred.parent() {
            Some(parent) => parent.join(&name),
            None => Utf8PathBuf::from(name),
        };
        if !taken.contains(&candidate) {
            return candidate;
        }
        attempt += 1;
    }
}

#[async_trait]
impl ExportEngine for BundleEngine {
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    async fn load_and_process(&self, paths: Vec<Utf8PathBuf>) -> Result<Project, LoadError> {
        let assets = self.collect_assets(&paths).await?;
        let scratch_dir = self.settings.scratch_root.join(format!(
            "stage-{}-{}",
            std::process::id(),
            self.scratch_seq.fetch_add(1, Ordering::Relaxed)
        ));
        let project = Project {
            assets,
            source_roots: paths,
            scratch_dir,
        };
        info!("Collected {}", project.summary());
        Ok(project)
    }

    async fn export(
        &self,
        project: Arc<Project>,
        destination: Utf8PathBuf,
    ) -> Result<ExportReport, ExportError> {
        tokio::fs::create_dir_all(&project.scratch_dir)
            .await
            .map_err(|source| ExportError::Staging {
                path: project.scratch_dir.clone(),
                source,
            })?;

        let mut files_written = 0usize;
        let mut bytes_written = 0u64;
        let mut taken = HashSet::new();
        for (index, asset) in project.assets.iter().enumerate() {
            let staged = project
                .scratch_dir
                .join(format!("{index:05}-{}", self.sanitize(&asset.name)));
            tokio::fs::copy(&asset.source_path, &staged)
                .await
                .map_err(|source| ExportError::Staging {
                    path: asset.source_path.clone(),
                    source,
                })?;

            let preferred = self.target_relative(asset);
            let relative = unique_target(&preferred, &taken);
            if relative != preferred {
                warn!(
                    "Export target {} already taken, writing {} as {}",
                    preferred, asset.source_path, relative
                );
            }
            let target = destination.join(&relative);
            taken.insert(relative);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|source| {
                    ExportError::Write {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
            // Rename out of staging; fall back to a copy when the scratch
            // root sits on a different filesystem.
            if tokio::fs::rename(&staged, &target).await.is_err() {
                tokio::fs::copy(&staged, &target)
                    .await
                    .map_err(|source| ExportError::Write {
                        path: target.clone(),
                        source,
                    })?;
            }

            files_written += 1;
            bytes_written += asset.size;
        }

        // Successful runs clean their own staging; the controller only has
        // to release temporaries after a failure.
        self.release_temporaries(Arc::clone(&project)).await;
        info!(
            "Exported {} files ({} bytes) to {}",
            files_written, bytes_written, destination
        );
        Ok(ExportReport {
            files_written,
            bytes_written,
        })
    }

    async fn release_temporaries(&self, project: Arc<Project>) {
        match tokio::fs::remove_dir_all(&project.scratch_dir).await {
            Ok(()) => debug!("Removed staging directory {}", project.scratch_dir),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => warn!(
                "Failed to remove staging directory {}: {}",
                project.scratch_dir, error
            ),
        }
    }
}
