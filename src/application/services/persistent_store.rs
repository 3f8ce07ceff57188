//! Typed access to the persisted credential, profile and message history.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::entities::{ApiKey, Message, UserProfile};
use crate::domain::errors::StorageError;
use crate::domain::ports::{RecordKey, StorePort};

/// Schema version written into every structured record.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    schema: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    schema: u32,
    data: serde_json::Value,
}

/// Serializes records and hands them to a [`StorePort`] backend.
///
/// Profile and messages are wrapped as `{"schema": N, "data": ...}`. Records
/// written before versioning existed (a bare object or array) are read as
/// schema 1 and upgraded on the next write.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn StorePort>,
}

impl PersistentStore {
    /// Creates store over the backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StorePort>) -> Self {
        Self { backend }
    }

    /// Persists the credential as raw text.
    ///
    /// # Errors
    /// Returns error if the backend write fails.
    pub fn save_credential(&self, credential: &ApiKey) -> Result<(), StorageError> {
        debug!(credential = %credential, "Saving credential");
        self.backend.write(RecordKey::Credential, credential.as_str())
    }

    /// Loads the credential; blank stored values count as absent.
    ///
    /// # Errors
    /// Returns error if the backend read fails.
    pub fn load_credential(&self) -> Result<Option<ApiKey>, StorageError> {
        Ok(self
            .backend
            .read(RecordKey::Credential)?
            .and_then(ApiKey::new))
    }

    /// Removes the credential.
    ///
    /// # Errors
    /// Returns error if the backend cannot remove the key.
    pub fn clear_credential(&self) -> Result<(), StorageError> {
        debug!("Clearing stored credential");
        self.backend.remove(RecordKey::Credential)
    }

    /// Persists the profile.
    ///
    /// # Errors
    /// Returns error if serialization or the backend write fails.
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.save_record(RecordKey::Profile, profile)
    }

    /// Loads the profile, normalizing it on the way in.
    ///
    /// # Errors
    /// Returns error if the backend read fails or the record is unusable.
    pub fn load_profile(&self) -> Result<Option<UserProfile>, StorageError> {
        Ok(self
            .load_record::<UserProfile>(RecordKey::Profile)?
            .map(UserProfile::normalized))
    }

    /// Persists the whole message history.
    ///
    /// # Errors
    /// Returns error if serialization or the backend write fails.
    pub fn save_messages(&self, messages: &[Message]) -> Result<(), StorageError> {
        self.save_record(RecordKey::Messages, &messages)
    }

    /// Loads the message history in stored (chronological) order.
    ///
    /// # Errors
    /// Returns error if the backend read fails or the record is unusable.
    pub fn load_messages(&self) -> Result<Option<Vec<Message>>, StorageError> {
        self.load_record(RecordKey::Messages)
    }

    /// Removes every persisted record.
    ///
    /// # Errors
    /// Returns error if any record cannot be removed.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        info!("Clearing all persisted data");
        self.backend.remove_all()
    }

    fn save_record<T: Serialize>(&self, key: RecordKey, value: &T) -> Result<(), StorageError> {
        let raw = encode(value)?;
        debug!(key = %key, bytes = raw.len(), "Saving record");
        self.backend.write(key, &raw)
    }

    fn load_record<T: DeserializeOwned>(&self, key: RecordKey) -> Result<Option<T>, StorageError> {
        match self.backend.read(key)? {
            Some(raw) => decode(key, &raw).map(Some),
            None => Ok(None),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, StorageError> {
    let envelope = EnvelopeRef {
        schema: SCHEMA_VERSION,
        data: value,
    };
    Ok(serde_json::to_string(&envelope)?)
}

fn decode<T: DeserializeOwned>(key: RecordKey, raw: &str) -> Result<T, StorageError> {
    let name = key.storage_key();
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| StorageError::malformed(name, e.to_string()))?;

    let is_envelope = value.get("schema").is_some() && value.get("data").is_some();
    let payload = if is_envelope {
        let envelope: Envelope = serde_json::from_value(value)
            .map_err(|e| StorageError::malformed(name, e.to_string()))?;
        if envelope.schema != SCHEMA_VERSION {
            return Err(StorageError::UnsupportedSchema {
                key: name,
                version: envelope.schema,
            });
        }
        envelope.data
    } else {
        debug!(key = name, "Reading unversioned record");
        value
    };

    serde_json::from_value(payload).map_err(|e| StorageError::malformed(name, e.to_string()))
}
