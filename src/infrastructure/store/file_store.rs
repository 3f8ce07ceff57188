//! File-backed store backend.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::errors::StorageError;
use crate::domain::ports::{RecordKey, StorePort};

/// Stores each record in its own file inside the data directory.
///
/// Writes go to a temporary file in the same directory that is then renamed
/// over the target, so a crash never leaves a half-written record. Temporary
/// files are created owner-readable only, which the rename preserves.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: RecordKey) -> PathBuf {
        self.dir.join(key.storage_key())
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if !self.dir.exists() {
            info!(path = %self.dir.display(), "Creating data directory");
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

impl StorePort for FileStore {
    fn read(&self, key: RecordKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: RecordKey, value: &str) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let mut temp_file = tempfile::NamedTempFile::new_in(&self.dir)?;
        temp_file.write_all(value.as_bytes())?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(self.path(key)).map_err(|e| e.error)?;

        debug!(key = %key, "Record written");
        Ok(())
    }

    fn remove(&self, key: RecordKey) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.read(RecordKey::Profile).unwrap().is_none());
    }

    #[test]
    fn test_write_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("luci");
        let store = FileStore::new(&data_dir);

        store.write(RecordKey::Credential, "tok123").unwrap();

        let content = fs::read_to_string(data_dir.join("luci_api_key")).unwrap();
        assert_eq!(content, "tok123");
    }

    #[test]
    fn test_survives_new_instance() {
        let dir = tempdir().unwrap();
        FileStore::new(dir.path())
            .write(RecordKey::Messages, "[]")
            .unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(
            reopened.read(RecordKey::Messages).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_remove_all_deletes_every_record() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        for key in RecordKey::ALL {
            store.write(key, "x").unwrap();
        }

        store.remove_all().unwrap();

        for key in RecordKey::ALL {
            assert!(!store.contains(key).unwrap());
        }
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.remove(RecordKey::Profile).is_ok());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.write(RecordKey::Profile, "{}").unwrap();
        store.write(RecordKey::Profile, "{\"name\":\"A\"}").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
