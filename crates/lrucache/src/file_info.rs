//! File metadata payload stored in the cache

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Metadata for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path the metadata was read from
    pub path: PathBuf,

    /// Size in bytes
    pub size: u64,

    /// Last access time
    pub accessed: DateTime<Utc>,
}

impl FileInfo {
    /// Build a record from known values
    pub fn new<P: Into<PathBuf>>(path: P, size: u64, accessed: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            size,
            accessed,
        }
    }

    /// Read metadata from the filesystem
    ///
    /// Falls back to the modification time, then to now, where the platform
    /// does not record access times.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path)?;

        let accessed = meta
            .accessed()
            .or_else(|_| meta.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Self {
            path: path.to_path_buf(),
            size: meta.len(),
            accessed,
        })
    }

    /// Cache key for this record
    ///
    /// # Errors
    /// `Error::NonUtf8Path` if the path is not valid UTF-8.
    pub fn key(&self) -> Result<&str> {
        path_key(&self.path)
    }
}

/// Cache key for `path`: its exact UTF-8 text.
///
/// Lossy conversion would let distinct paths share a key, so non-UTF-8
/// paths are rejected.
pub(crate) fn path_key(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))
}
