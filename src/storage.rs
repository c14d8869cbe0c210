use crate::errors::StorageError;
use std::{collections::BTreeMap, fs, io::ErrorKind, path::PathBuf};
use tracing::warn;

/// Synchronous string key-value persistence, shaped like browser local
/// storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keeps every key in one JSON object on disk: `{ "<key>": "<value>" }`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(err @ StorageError::Corrupt { .. }) => {
                warn!("replacing unreadable storage file: {err}");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        document.insert(key.to_string(), value.to_string());

        let payload = serde_json::to_vec_pretty(&document)?;
        fs::write(&self.path, payload).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
pub use memory::MemoryStorage;

#[cfg(test)]
mod memory {
    use super::KeyValueStore;
    use crate::errors::StorageError;
    use std::{
        collections::HashMap,
        io::{Error, ErrorKind},
        path::PathBuf,
        sync::Mutex,
    };

    /// Process-local storage for tests.
    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        values: Mutex<HashMap<String, String>>,
        read_only: bool,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// Storage that answers reads but refuses every write.
        pub fn read_only() -> Self {
            Self {
                values: Mutex::default(),
                read_only: true,
            }
        }

        pub fn with_value(self, key: &str, value: &str) -> Self {
            self.lock().insert(key.to_string(), value.to_string());
            self
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
            self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    impl KeyValueStore for MemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.lock().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.read_only {
                return Err(StorageError::Io {
                    path: PathBuf::from("<memory>"),
                    source: Error::new(ErrorKind::PermissionDenied, "storage is read-only"),
                });
            }
            self.lock().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("slice_storage_{name}_{}_{nanos}.json", std::process::id()));
        path
    }

    #[test]
    fn file_storage_missing_file_reads_as_absent() {
        let storage = FileStorage::new(unique_path("missing"));
        assert_eq!(storage.get("slice-v1").unwrap(), None);
    }

    #[test]
    fn file_storage_keeps_other_keys() {
        let path = unique_path("keys");
        let storage = FileStorage::new(&path);
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();
        storage.set("a", "3").unwrap();

        assert_eq!(storage.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn file_storage_reports_corrupt_document_and_recovers_on_write() {
        let path = unique_path("corrupt");
        fs::write(&path, "not json at all").unwrap();
        let storage = FileStorage::new(&path);

        assert!(matches!(
            storage.get("slice-v1"),
            Err(StorageError::Corrupt { .. })
        ));

        storage.set("slice-v1", "{}").unwrap();
        assert_eq!(storage.get("slice-v1").unwrap().as_deref(), Some("{}"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn memory_storage_read_only_refuses_writes() {
        let storage = MemoryStorage::read_only().with_value("k", "v");
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        assert!(storage.set("k", "w").is_err());
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
