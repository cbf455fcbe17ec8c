// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! String key-value storage, the server-side stand-in for browser local
//! storage.
//!
//! Reads and writes are synchronous. Two backends exist: an in-memory map
//! (tests, ephemeral runs) and a directory with one file per key.

use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Minimal local-storage contract.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `Ok(None)` when the slot was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Erase a slot. Removing a missing slot is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// File-backed storage: slot `key` lives at `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir)?;

        // Readers never observe a partially written slot
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// Storage backend selected from configuration.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory(MemoryStore),
    File(FileStore),
}

impl StorageBackend {
    /// File storage under `dir` when given, memory otherwise.
    pub fn from_path(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => StorageBackend::File(FileStore::new(dir)),
            None => StorageBackend::Memory(MemoryStore::new()),
        }
    }
}

impl KeyValueStore for StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            StorageBackend::Memory(s) => s.get_item(key),
            StorageBackend::File(s) => s.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            StorageBackend::Memory(s) => s.set_item(key, value),
            StorageBackend::File(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match self {
            StorageBackend::Memory(s) => s.remove_item(key),
            StorageBackend::File(s) => s.remove_item(key),
        }
    }
}

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Failed to serialize stored value: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "mapty-storage-{}-{}-{}",
            name,
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_memory_store_shares_slots_between_clones() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set_item("workouts", "[]").unwrap();
        assert_eq!(other.get_item("workouts").unwrap().as_deref(), Some("[]"));

        other.remove_item("workouts").unwrap();
        assert_eq!(store.get_item("workouts").unwrap(), None);
    }

    #[test]
    fn test_file_store_overwrite_and_remove() {
        let dir = scratch_dir("overwrite");
        let store = FileStore::new(&dir);

        assert_eq!(store.get_item("workouts").unwrap(), None);
        store.set_item("workouts", "[1]").unwrap();
        store.set_item("workouts", "[1,2]").unwrap();
        assert_eq!(store.get_item("workouts").unwrap().as_deref(), Some("[1,2]"));

        store.remove_item("workouts").unwrap();
        store.remove_item("workouts").unwrap();
        assert_eq!(store.get_item("workouts").unwrap(), None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let store = FileStore::new(scratch_dir("keys"));
        assert!(matches!(
            store.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.get_item(""),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
