//! Disk Store Module
//!
//! Write-through mirror of a cache on local disk: one file per key, named
//! by a hash of the key, inside a per-cache directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CacheError, Result};

// == Disk Store ==
/// File-per-key storage rooted at a cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskStore {
    directory: PathBuf,
}

impl DiskStore {
    // == Constructor ==
    /// Creates a store for `directory`. Nothing is touched on disk until the
    /// first write.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The backing directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    // == File Name ==
    /// Maps a key to its on-disk file name: the UUID v5 (SHA-1) of the key
    /// in the nil namespace. Stable across processes and restarts.
    pub fn file_name(key: &str) -> String {
        Uuid::new_v5(&Uuid::nil(), key.as_bytes())
            .hyphenated()
            .to_string()
    }

    /// Full path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(Self::file_name(key))
    }

    // == Write ==
    /// Writes `data` as the file for `key`.
    ///
    /// The directory is created on demand. Data goes to a temporary sibling
    /// first and is renamed over the target, so readers never see a partial
    /// file.
    pub fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        create_private_dir(&self.directory)
            .map_err(|e| CacheError::io(&self.directory, e))?;

        let path = self.path_for(key);
        let temp_path = path.with_extension(format!("tmp.{}", Uuid::new_v4().simple()));

        if let Err(e) = write_private_file(&temp_path, data) {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::io(temp_path, e));
        }
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::io(path, e));
        }

        debug!(key = %key, path = %path.display(), bytes = data.len(), "Wrote cache file");
        Ok(())
    }

    // == Read ==
    /// Reads the file for `key`. A missing file is a miss (`Ok(None)`), not
    /// an error.
    pub fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::io(path, e)),
        }
    }

    // == Remove ==
    /// Best-effort removal of the file for `key`. Returns true if a file was
    /// deleted.
    pub fn remove(&self, key: &str) -> bool {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(key = %key, path = %path.display(), error = %e, "Failed to remove cache file");
                false
            }
        }
    }

    // == Remove All ==
    /// Deletes the whole cache directory. A missing directory is not an error.
    pub fn remove_all(&self) -> Result<()> {
        match fs::remove_dir_all(&self.directory) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(&self.directory, e)),
        }
    }
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn write_private_file(path: &Path, data: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(data)?;
    file.sync_all()
}
