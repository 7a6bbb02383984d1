//! Durable key/value cache for mirrored collections.
//!
//! # Backends
//!
//! - [`FileCache`]: one `<key>.json` file per key under a directory
//! - [`MemoryCache`]: entries held in memory (tests, ephemeral sessions)

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{Error, Result};

/// Synchronous key -> JSON text store.
pub trait CacheBackend: Send + Sync {
    /// Reads an entry; `None` when the key was never written.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Writes an entry, replacing any previous value.
    fn store(&self, key: &str, json: &str) -> Result<()>;

    /// Deletes an entry. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Reads and parses a cached value.
pub fn load_json<T: DeserializeOwned>(cache: &dyn CacheBackend, key: &str) -> Result<Option<T>> {
    match cache.load(key)? {
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| Error::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serializes and writes a value.
pub fn store_json<T: Serialize + ?Sized>(cache: &dyn CacheBackend, key: &str, value: &T) -> Result<()> {
    let text = serde_json::to_string(value)?;
    cache.store(key, &text)
}

fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidKey(key.to_string()))
    }
}

// ============================================================================
// FileCache
// ============================================================================

/// Cache stored as one JSON file per key.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous entry intact.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Creates a cache rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CacheBackend for FileCache {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io_with_path(e, &path)),
        }
    }

    fn store(&self, key: &str, json: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| Error::io_with_path(e, &self.dir))?;

        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        {
            let mut file = fs::File::create(&tmp).map_err(|e| Error::io_with_path(e, &tmp))?;
            file.write_all(json.as_bytes())
                .and_then(|()| file.sync_all())
                .map_err(|e| Error::io_with_path(e, &tmp))?;
        }
        fs::rename(&tmp, &path).map_err(|e| Error::io_with_path(e, &path))?;

        tracing::trace!(key, bytes = json.len(), path = %path.display(), "Wrote cache entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io_with_path(e, &path)),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

// ============================================================================
// MemoryCache
// ============================================================================

/// Cache held in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheBackend for MemoryCache {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn store(&self, key: &str, json: &str) -> Result<()> {
        check_key(key)?;
        self.lock().insert(key.to_string(), json.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
