//! Local persistence for client-side records
//!
//! Plays the role the browser's local storage plays for the web client:
//! small JSON records under well-known string keys. Records either live in
//! memory or as one file per key under a configured directory. Malformed
//! stored data is treated as absent rather than surfaced as an error, so a
//! corrupt record can never take the client down.

use crate::error::Error;
use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

/// Storage key for the cached session
pub const SESSION_KEY: &str = "auth_user";

/// Storage key for the in-flight event draft
pub const DRAFT_KEY: &str = "event_draft";

enum Backend {
    Memory(RwLock<HashMap<String, String>>),
    Dir(PathBuf),
}

/// String-keyed JSON record store
pub struct LocalStore {
    backend: Backend,
}

impl LocalStore {
    /// Create a store whose records live in memory only
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store persisting one JSON file per key under `dir`.
    /// The directory is created on first write.
    pub fn dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Dir(dir.into()),
        }
    }

    fn file_path(dir: &PathBuf, key: &str) -> PathBuf {
        dir.join(format!("{}.json", key))
    }

    /// Read the raw record under `key`, or None if absent or unreadable
    pub fn get_raw(&self, key: &str) -> Option<String> {
        match &self.backend {
            Backend::Memory(map) => map.read().unwrap().get(key).cloned(),
            Backend::Dir(dir) => match fs::read_to_string(Self::file_path(dir, key)) {
                Ok(raw) => Some(raw),
                Err(err) if err.kind() == ErrorKind::NotFound => None,
                Err(err) => {
                    warn!("failed to read stored record {}: {}", key, err);
                    None
                }
            },
        }
    }

    /// Write the raw record under `key`
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), Error> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().unwrap().insert(key.to_string(), value.to_string());
                Ok(())
            }
            Backend::Dir(dir) => {
                fs::create_dir_all(dir)?;
                fs::write(Self::file_path(dir, key), value)?;
                Ok(())
            }
        }
    }

    /// Remove the record under `key`; removing an absent record is not an error
    pub fn remove(&self, key: &str) -> Result<(), Error> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().unwrap().remove(key);
                Ok(())
            }
            Backend::Dir(dir) => match fs::remove_file(Self::file_path(dir, key)) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            },
        }
    }

    /// Read and deserialize the record under `key`.
    /// Malformed data is discarded with a warning and reads as None.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("discarding malformed stored record {}: {}", key, err);
                None
            }
        }
    }

    /// Serialize and write the record under `key`
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), Error> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: i64,
    }

    #[test]
    fn memory_round_trip() {
        let store = LocalStore::memory();
        let record = Record {
            name: "open".to_string(),
            count: 3,
        };

        store.set("record", &record).unwrap();
        assert_eq!(store.get::<Record>("record"), Some(record));

        store.remove("record").unwrap();
        assert_eq!(store.get::<Record>("record"), None);
    }

    #[test]
    fn malformed_record_reads_as_absent() {
        let store = LocalStore::memory();
        store.set_raw("record", "{not json").unwrap();
        assert_eq!(store.get::<Record>("record"), None);
    }

    #[test]
    fn dir_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::dir(dir.path());
        let record = Record {
            name: "club".to_string(),
            count: 12,
        };

        store.set("record", &record).unwrap();
        assert!(dir.path().join("record.json").exists());

        assert_eq!(store.get::<Record>("record"), Some(record));

        store.remove("record").unwrap();
        assert!(!dir.path().join("record.json").exists());
        // removing again is fine
        store.remove("record").unwrap();
    }

    #[test]
    fn dir_missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::dir(dir.path());
        assert_eq!(store.get::<Record>("record"), None);
    }
}
