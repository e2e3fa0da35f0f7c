//! Keyed JSON record backends
//!
//! Directory structure for the file backend:
//! ```text
//! {data-dir}/records/
//! ├── user_progress.json      # UserProgress
//! └── flashcard_memory.json   # FlashcardMemory
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Invalid record key: {0:?}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A store of whole JSON documents addressed by key.
///
/// Each call is a single read or a single write of one record. Writers
/// replace the full document; there are no partial updates.
pub trait RecordStore {
    /// Raw contents of the record, or `None` if it was never written
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the record with `contents`
    fn write(&self, key: &str, contents: &str) -> Result<()>;

    /// Delete the record. Removing an absent record is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Record store shared between the progress and flashcard stores
pub type SharedRecordStore = Arc<dyn RecordStore + Send + Sync>;

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Read and decode a record, treating anything unreadable as absent.
///
/// Corrupt local state must never block the learner, so decode and read
/// failures are logged and reported as `None`.
pub fn read_record<T: DeserializeOwned>(store: &dyn RecordStore, key: &str) -> Option<T> {
    let content = match store.read(key) {
        Ok(Some(content)) => content,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read record '{}', starting empty: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding malformed record '{}': {}", key, e);
            None
        }
    }
}

/// Encode and write a record, propagating any failure
pub fn write_record<T: Serialize>(store: &dyn RecordStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    store.write(key, &json)
}

/// File-backed records, one JSON file per key
pub struct FileRecordStore {
    records_dir: PathBuf,
}

impl FileRecordStore {
    /// Create a store under `data_dir`, creating the records directory if needed
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let records_dir = data_dir.join("records");
        fs::create_dir_all(&records_dir)?;
        Ok(Self { records_dir })
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("mastery"))
            .ok_or(StorageError::DataDirNotFound)
    }

    fn record_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.records_dir.join(format!("{}.json", key)))
    }
}

impl RecordStore for FileRecordStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomic write through a uniquely named temp file in the same directory
    fn write(&self, key: &str, contents: &str) -> Result<()> {
        let path = self.record_path(key)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", key))
            .suffix(".tmp")
            .tempfile_in(&self.records_dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        log::debug!("Wrote record '{}' ({} bytes)", key, contents.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed record '{}'", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory records, for tests and embedding without a filesystem
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.records().get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        validate_key(key)?;
        self.records().insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.records().remove(key);
        Ok(())
    }
}

/// Memory store whose writes and removals can be switched to fail
#[cfg(test)]
#[derive(Default)]
pub(crate) struct FailingRecordStore {
    inner: MemoryRecordStore,
    failing: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl FailingRecordStore {
    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
impl RecordStore for FailingRecordStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        self.check()?;
        self.inner.write(key, contents)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.remove(key)
    }
}
