//! Loading a workspace into a relationship manager.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use filekin_core::{LinkConfig, PathChanges, RelationshipManager, CONFIG_FILENAME};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A walked workspace and the manager fed with its files.
pub struct Workspace {
    pub root: PathBuf,
    pub manager: RelationshipManager,
    pub file_count: usize,
}

impl Workspace {
    /// Load the link configuration and register every file under `root`.
    pub fn load(root: &Path, config: Option<&Path>) -> Result<Self> {
        // Canonicalize path to handle relative paths
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let config_path = config
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.join(CONFIG_FILENAME));

        let config = LinkConfig::load(&config_path).with_context(|| {
            format!("Failed to load link configuration from {}", config_path.display())
        })?;

        let mut manager = RelationshipManager::new();
        manager.apply_configuration(&config)?;

        let files = collect_files(&root);
        let file_count = files.len();
        manager.apply_path_changes(&PathChanges::added(files));

        info!(
            root = %root.display(),
            files = file_count,
            relevant = manager.known_path_count(),
            "Loaded workspace"
        );

        Ok(Self {
            root,
            manager,
            file_count,
        })
    }

    /// Resolve a user-supplied path to the form fed to the manager.
    pub fn resolve(&self, path: &Path) -> String {
        let path = path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.root.join(path)
            }
        });
        path.display().to_string()
    }

    /// Path relative to the root for display.
    pub fn display<'a>(&self, path: &'a str) -> std::borrow::Cow<'a, str> {
        match Path::new(path).strip_prefix(&self.root) {
            Ok(relative) => relative.to_string_lossy().into_owned().into(),
            Err(_) => path.into(),
        }
    }
}

/// Every file below `root`, skipping hidden and blacklisted entries.
pub fn collect_files(root: &Path) -> Vec<String> {
    let files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (!is_hidden(e) && !is_blacklisted(e)))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().display().to_string())
        .collect();

    debug!(root = %root.display(), files = files.len(), "Collected workspace files");
    files
}

/// Check if entry is hidden (starts with .).
fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Check if entry is in a blacklisted directory.
fn is_blacklisted(entry: &walkdir::DirEntry) -> bool {
    const BLACKLIST: &[&str] = &["target", "__pycache__", "venv"];

    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|s| BLACKLIST.contains(&s))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_skips_hidden_and_blacklisted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join(".git/HEAD"), "").unwrap();
        fs::write(dir.path().join("target/out.ts"), "").unwrap();
        fs::write(dir.path().join(".env"), "").unwrap();

        let files = collect_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.ts"));
    }
}
