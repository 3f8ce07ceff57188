//! Persistent store port definition.

use crate::domain::errors::StorageError;

/// Fixed logical records kept by the persistent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    /// AI endpoint credential, stored as raw text.
    Credential,
    /// User profile, stored as a JSON object.
    Profile,
    /// Message history, stored as a JSON array.
    Messages,
}

impl RecordKey {
    /// All records, in the order they are loaded at startup.
    pub const ALL: [Self; 3] = [Self::Credential, Self::Profile, Self::Messages];

    /// Returns the key the record is stored under.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Credential => "luci_api_key",
            Self::Profile => "luci_profile",
            Self::Messages => "luci_messages",
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Port for durable key/value persistence of serialized records.
///
/// Writes are atomic per key. Implementations hold no typed state: they only
/// move text in and out of durable storage.
pub trait StorePort: Send + Sync {
    /// Reads the raw value, `None` if the key was never written.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read.
    fn read(&self, key: RecordKey) -> Result<Option<String>, StorageError>;

    /// Writes the raw value, replacing any previous one.
    ///
    /// # Errors
    /// Returns error if the backend cannot be written.
    fn write(&self, key: RecordKey, value: &str) -> Result<(), StorageError>;

    /// Removes one key. Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns error if the backend cannot be modified.
    fn remove(&self, key: RecordKey) -> Result<(), StorageError>;

    /// Removes every key this store owns.
    ///
    /// # Errors
    /// Returns error if any key cannot be removed.
    fn remove_all(&self) -> Result<(), StorageError> {
        for key in RecordKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }

    /// Checks if a value exists for the key.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read.
    fn contains(&self, key: RecordKey) -> Result<bool, StorageError> {
        Ok(self.read(key)?.is_some())
    }
}
