//! Keyring-backed credential storage.

use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::errors::StorageError;
use crate::domain::ports::{RecordKey, StorePort};

const KEYRING_SERVICE: &str = "luci";
const KEYRING_USER: &str = "api_key";

/// Keeps the credential in the system keyring and every other record in
/// the wrapped store.
pub struct KeyringStore<S> {
    inner: S,
    service: String,
    user: String,
}

impl<S: StorePort> KeyringStore<S> {
    /// Creates store with default keyring names.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self::with_names(inner, KEYRING_SERVICE, KEYRING_USER)
    }

    /// Creates store with custom keyring names.
    #[must_use]
    pub fn with_names(inner: S, service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            inner,
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StorageError> {
        Entry::new(&self.service, &self.user)
            .map_err(|e| StorageError::Keyring(format!("failed to access keyring: {e}")))
    }

    fn read_secret(&self) -> Result<Option<String>, StorageError> {
        debug!(service = %self.service, "Retrieving credential from keyring");

        match self.entry()?.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => {
                debug!("No credential stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve credential from keyring");
                Err(StorageError::Keyring(e.to_string()))
            }
        }
    }

    fn write_secret(&self, value: &str) -> Result<(), StorageError> {
        debug!(service = %self.service, "Storing credential in keyring");

        self.entry()?.set_password(value).map_err(|e| {
            warn!(error = %e, "Failed to store credential in keyring");
            StorageError::Keyring(e.to_string())
        })
    }

    fn delete_secret(&self) -> Result<(), StorageError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Failed to delete credential from keyring");
                Err(StorageError::Keyring(e.to_string()))
            }
        }
    }
}

impl<S: StorePort> StorePort for KeyringStore<S> {
    fn read(&self, key: RecordKey) -> Result<Option<String>, StorageError> {
        match key {
            RecordKey::Credential => self.read_secret(),
            _ => self.inner.read(key),
        }
    }

    fn write(&self, key: RecordKey, value: &str) -> Result<(), StorageError> {
        match key {
            RecordKey::Credential => self.write_secret(value),
            _ => self.inner.write(key, value),
        }
    }

    fn remove(&self, key: RecordKey) -> Result<(), StorageError> {
        match key {
            RecordKey::Credential => self.delete_secret(),
            _ => self.inner.remove(key),
        }
    }

    fn remove_all(&self) -> Result<(), StorageError> {
        let secret = self.delete_secret();
        self.inner.remove_all()?;
        secret
    }
}
