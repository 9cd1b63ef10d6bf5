//! Cache manager for persisting legislator rosters to disk
//!
//! Provides a `CacheManager` that stores one JSON file per jurisdiction.
//! Writes go to a per-process temp file which is then renamed over the
//! target, so a reader sees either the old or the new roster, never a
//! partial one.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::{Jurisdiction, Roster};

/// Errors that can occur when writing to the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache directory could not be created
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temp file could not be written
    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temp file could not be moved into place
    #[error("Failed to replace cache file {path}: {source}")]
    Rename {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The value could not be serialized
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Manages reading and writing cached rosters on disk
///
/// Rosters are stored as JSON files in an XDG-compliant cache directory
/// (`~/.cache/civiclookup/` on Linux), one file per jurisdiction code. The
/// fetch timestamp is embedded in the file, so freshness does not depend on
/// filesystem mtimes.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "civiclookup")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the roster file for a jurisdiction
    pub fn roster_path(&self, jurisdiction: Jurisdiction) -> PathBuf {
        self.cache_path(jurisdiction.code())
    }

    /// Reads the cached roster for a jurisdiction
    ///
    /// Returns `None` if the file is missing or cannot be parsed; a corrupt
    /// file is treated like a missing one so the caller refreshes it.
    pub fn read_roster(&self, jurisdiction: Jurisdiction) -> Option<Roster> {
        let roster: Roster = self.read(jurisdiction.code())?;
        if roster.jurisdiction != jurisdiction {
            tracing::warn!(
                jurisdiction = %jurisdiction,
                found = %roster.jurisdiction,
                "cache file holds a different jurisdiction; ignoring"
            );
            return None;
        }
        Some(roster)
    }

    /// Writes a roster, replacing any previous entry for its jurisdiction
    pub fn write_roster(&self, roster: &Roster) -> Result<PathBuf, CacheError> {
        self.write(roster.jurisdiction.code(), roster)
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).map_err(|source| CacheError::CreateDir {
            path: self.cache_dir.clone(),
            source,
        })
    }

    /// Serializes `data` and atomically replaces the file for `key`
    fn write<T: Serialize>(&self, key: &str, data: &T) -> Result<PathBuf, CacheError> {
        self.ensure_dir()?;

        let json = serde_json::to_string_pretty(data)?;
        let path = self.cache_path(key);
        let temp_path = self
            .cache_dir
            .join(format!("{}.{}.tmp", key, std::process::id()));

        if let Err(source) = fs::write(&temp_path, json) {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::Write {
                path: temp_path,
                source,
            });
        }

        if let Err(source) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::Rename { path, source });
        }

        tracing::debug!(path = %path.display(), "wrote cache file");
        Ok(path)
    }

    /// Reads and deserializes the file for `key`
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.cache_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read cache file");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse cache file");
                None
            }
        }
    }
}
