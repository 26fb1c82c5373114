use camino::Utf8PathBuf;

/// One file captured from the selected inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// File name as it appeared on disk.
    pub name: String,

    /// Path relative to the source root the entry was collected from.
    pub relative_path: Utf8PathBuf,

    /// Absolute path of the original file.
    pub source_path: Utf8PathBuf,

    /// Size in bytes at load time.
    pub size: u64,
}

/// The in-memory result of a successful load.
///
/// A project bundles the collected asset entries with the scratch directory
/// its export temporaries are staged under. The controller treats it as
/// opaque: it installs, reads, and discards whole instances through
/// [`crate::state::StateManager`], while the entries themselves are only
/// interpreted by the export engine.
#[derive(Debug, Clone)]
pub struct Project {
    pub assets: Vec<AssetEntry>,

    /// The paths the user selected for this load.
    pub source_roots: Vec<Utf8PathBuf>,

    /// Staging area for export temporaries, unique per load.
    pub scratch_dir: Utf8PathBuf,
}

impl Project {
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    pub fn total_size(&self) -> u64 {
        self.assets.iter().map(|asset| asset.size).sum()
    }

    /// One-line description for status displays and log lines.
    pub fn summary(&self) -> String {
        format!(
            "{} assets ({} bytes) from {} selections",
            self.asset_count(),
            self.total_size(),
            self.source_roots.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        Project {
            assets: vec![
                AssetEntry {
                    name: "model.bundle".to_string(),
                    relative_path: Utf8PathBuf::from("model.bundle"),
                    source_path: Utf8PathBuf::from("/data/model.bundle"),
                    size: 512,
                },
                AssetEntry {
                    name: "texture.pak".to_string(),
                    relative_path: Utf8PathBuf::from("textures/texture.pak"),
                    source_path: Utf8PathBuf::from("/data/textures/texture.pak"),
                    size: 1024,
                },
            ],
            source_roots: vec![Utf8PathBuf::from("/data")],
            scratch_dir: Utf8PathBuf::from("/tmp/scratch/bundle-0"),
        }
    }

    #[test]
    fn test_asset_count() {
        assert_eq!(sample_project().asset_count(), 2);
    }

    #[test]
    fn test_total_size() {
        assert_eq!(sample_project().total_size(), 1536);
    }

    #[test]
    fn test_summary() {
        let summary = sample_project().summary();
        assert!(summary.contains("2 assets"));
        assert!(summary.contains("1536 bytes"));
        assert!(summary.contains("1 selections"));
    }
}
