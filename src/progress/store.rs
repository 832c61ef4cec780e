use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::StoreError;

/// String key-value storage the progress model persists into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    /// Wipes every key.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-memory store with an optional byte quota over all keys and values.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            if self.used_without(key) + key.len() + value.len() > quota {
                return Err(StoreError::QuotaExceeded);
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// Store persisted as one JSON object in a file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Entries for a write. A corrupt file is replaced rather than blocking
    /// every later write.
    fn entries_for_write(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.read_all() {
            Err(StoreError::Corrupt(e)) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt store file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries_for_write()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_enforces_quota() {
        let mut store = MemoryStore::with_quota(16);
        store.set("k", "short").expect("fits");
        assert!(matches!(
            store.set("other", "far too long for the quota"),
            Err(StoreError::QuotaExceeded)
        ));
        // Replacing a value only counts the new size.
        store.set("k", "0123456789").expect("replacement fits");
    }

    #[test]
    fn file_store_persists_between_instances() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("storage.json");

        let mut store = FileStore::new(&path);
        store.set("progress", "{}").expect("set");
        store.set("quizProgress-mision1", "{}").expect("set");
        store.remove("progress").expect("remove");

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("progress").expect("get"), None);
        assert_eq!(reopened.get("quizProgress-mision1").expect("get").as_deref(), Some("{}"));
    }

    #[test]
    fn corrupt_file_is_reported_on_read_and_replaced_on_write() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("storage.json");
        std::fs::write(&path, "{broken").expect("write");

        let mut store = FileStore::new(&path);
        assert!(matches!(store.get("progress"), Err(StoreError::Corrupt(_))));
        store.set("progress", "{}").expect("set");
        assert_eq!(store.get("progress").expect("get").as_deref(), Some("{}"));
    }

    #[test]
    fn clear_removes_everything() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::new(tmp.path().join("storage.json"));
        store.set("progress", "{}").expect("set");
        store.clear().expect("clear");
        assert_eq!(store.get("progress").expect("get"), None);
    }
}
