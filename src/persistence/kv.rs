use super::files::{atomic_write, read_file};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a single read or write against the key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read `{key}`: {message}")]
    Read { key: String, message: String },
    #[error("failed to write `{key}`: {message}")]
    Write { key: String, message: String },
    #[error("failed to encode `{key}`")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Named-value store the session hydrates from and writes back to
pub trait KeyValueStore {
    /// Raw stored value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside the data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        read_file(self.path_for(key)).map_err(|err| StoreError::Read {
            key: key.to_string(),
            message: format!("{:#}", err),
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        atomic_write(self.path_for(key), value).map_err(|err| StoreError::Write {
            key: key.to_string(),
            message: format!("{:#}", err),
        })
    }
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: std::collections::HashMap<String, String>,
    fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, as a full or unavailable store would
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write {
                key: key.to_string(),
                message: "store rejected the write".to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_get_missing_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(temp_dir.path());
        assert!(store.get("tasks").unwrap().is_none());
    }

    #[test]
    fn test_file_store_set_then_get() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        store.set("darkMode", "true").unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("true"));
        assert!(temp_dir.path().join("darkMode.json").exists());
    }

    #[test]
    fn test_file_store_write_into_missing_dir_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(&temp_dir.path().join("gone"));
        let err = store.set("tasks", "[]").unwrap_err();
        assert!(matches!(err, StoreError::Write { ref key, .. } if key == "tasks"));
    }

    #[test]
    fn test_memory_store_failing_writes() {
        let mut store = MemoryStore::new();
        store.set("tasks", "[]").unwrap();
        store.set_fail_writes(true);
        assert!(store.set("tasks", "[1]").is_err());
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
    }
}
