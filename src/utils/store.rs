//! Local artifact layout: `<root>/<workspace id>/<source name>/...`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{CollectError, CollectResult};

/// Creates per-source artifact directories and prunes the ones left empty.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore;

impl ArtifactStore {
    pub fn new() -> Self {
        Self
    }

    /// Path of the artifact directory for one source.
    pub fn artifact_path(&self, root: &Path, workspace_id: &str, source_name: &str) -> PathBuf {
        root.join(workspace_id).join(source_name)
    }

    /// Create `path` and all missing ancestors. Idempotent.
    pub fn ensure_directory(&self, path: &Path) -> CollectResult<()> {
        fs::create_dir_all(path).map_err(|source| CollectError::Store {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Remove `path` if it exists and has no entries.
    ///
    /// Returns `Ok(true)` when the directory was removed.
    pub fn prune_if_empty(&self, path: &Path) -> io::Result<bool> {
        let mut entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };

        if entries.next().is_some() {
            return Ok(false);
        }

        match fs::remove_dir(path) {
            Ok(()) => {
                debug!("Removed empty artifact directory {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create the directory and return a guard that prunes it when released or dropped.
    pub fn acquire(&self, path: PathBuf) -> CollectResult<ArtifactDir> {
        self.ensure_directory(&path)?;
        Ok(ArtifactDir {
            store: self.clone(),
            path,
            released: false,
        })
    }
}

/// Artifact directory owned by one source while it is being retrieved.
///
/// Pruning runs exactly once: on [`ArtifactDir::release`], or on drop if the
/// retrieval unwound before reaching it.
#[derive(Debug)]
pub struct ArtifactDir {
    store: ArtifactStore,
    path: PathBuf,
    released: bool,
}

impl ArtifactDir {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prune the directory if empty; returns its path if it still holds artifacts.
    pub fn release(mut self) -> Option<PathBuf> {
        self.released = true;
        self.prune();
        if self.path.is_dir() {
            Some(self.path.clone())
        } else {
            None
        }
    }

    fn prune(&self) {
        if let Err(e) = self.store.prune_if_empty(&self.path) {
            warn!(
                "Error of removal of empty log directory {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl Drop for ArtifactDir {
    fn drop(&mut self) {
        if !self.released {
            self.prune();
        }
    }
}
