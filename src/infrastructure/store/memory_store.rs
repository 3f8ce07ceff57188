//! In-memory store backend.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::errors::StorageError;
use crate::domain::ports::{RecordKey, StorePort};

/// Volatile store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<RecordKey, String>>,
}

impl MemoryStore {
    /// Creates empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl StorePort for MemoryStore {
    fn read(&self, key: RecordKey) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(&key).cloned())
    }

    fn write(&self, key: RecordKey, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: RecordKey) -> Result<(), StorageError> {
        self.entries.lock().remove(&key);
        Ok(())
    }

    fn remove_all(&self) -> Result<(), StorageError> {
        self.entries.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_remove() {
        let store = MemoryStore::new();
        assert!(store.read(RecordKey::Profile).unwrap().is_none());

        store.write(RecordKey::Profile, "{}").unwrap();
        assert_eq!(store.read(RecordKey::Profile).unwrap().as_deref(), Some("{}"));

        store.remove(RecordKey::Profile).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let store = MemoryStore::new();
        store.write(RecordKey::Credential, "old").unwrap();
        store.write(RecordKey::Credential, "new").unwrap();

        assert_eq!(store.read(RecordKey::Credential).unwrap().as_deref(), Some("new"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove(RecordKey::Messages).is_ok());
    }
}
