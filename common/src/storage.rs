//! Key-value storage abstraction for the stateful components.
//!
//! The rate cache and the ledger persist through this interface instead of
//! reaching for ambient storage, so tests can inject a double and the demo
//! can choose between in-memory and on-disk stores.

use dashmap::DashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure for a key.
    #[error("Storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// A record could not be encoded or decoded.
    #[error("Malformed record for key '{key}': {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Wrap an I/O error with the key it occurred on.
    pub fn io(key: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }

    /// Wrap an encode/decode error with the key it occurred on.
    pub fn codec(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Codec {
            key: key.into(),
            source,
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable string key-value storage.
///
/// Whole-record replacement semantics: `set` overwrites the prior value
/// for the key. Callers layering read-modify-write cycles on top are
/// responsible for their own write serialization.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for a key, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write the value for a key, replacing any prior value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// In-memory store. The default for tests and ephemeral demo runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys present.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.clone()))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one file per key under a base directory.
///
/// Stands in for the original client's durable local storage, surviving
/// process restarts within the same device scope.
#[derive(Debug)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .map_err(|e| StorageError::io(base_dir.display().to_string(), e))?;
        Ok(Self { base_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        fs::write(self.path_for(key), value).map_err(|e| StorageError::io(key, e))
    }
}
