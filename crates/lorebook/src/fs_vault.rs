//! Filesystem vault — recursive markdown enumeration under a root folder.

use loreweave_core::{Vault, VaultError};
use std::path::{Path, PathBuf};
use tracing::warn;

/// A vault backed by a directory tree of markdown files.
///
/// Paths are reported relative to the root with `/` separators, sorted, so
/// selection order is deterministic across platforms.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collect(&self, dir: &Path, out: &mut Vec<String>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable vault directory");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.collect(&path, out);
            } else if path.extension().is_some_and(|ext| ext == "md") {
                if let Ok(relative) = path.strip_prefix(&self.root) {
                    let rel = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    out.push(rel);
                }
            }
        }
    }
}

impl Vault for FsVault {
    fn list_paths(&self) -> std::result::Result<Vec<String>, VaultError> {
        let mut paths = Vec::new();
        self.collect(&self.root, &mut paths);
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> std::result::Result<String, VaultError> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|e| VaultError::Io {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}
