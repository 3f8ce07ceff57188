//! Persistent store error types.

use thiserror::Error;

/// Persistent store error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record '{key}' is malformed: {reason}")]
    Malformed { key: &'static str, reason: String },

    #[error("record '{key}' uses unsupported schema version {version}")]
    UnsupportedSchema { key: &'static str, version: u32 },

    #[error("secure storage error: {0}")]
    Keyring(String),

    #[error("storage not available: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Creates malformed record error.
    #[must_use]
    pub fn malformed(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            key,
            reason: reason.into(),
        }
    }

    /// Returns whether the stored bytes were readable but not usable.
    ///
    /// These records are replaced by defaults on load and overwritten on the
    /// next write.
    #[must_use]
    pub const fn is_corrupt_record(&self) -> bool {
        matches!(
            self,
            Self::Malformed { .. } | Self::UnsupportedSchema { .. } | Self::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_record_classification() {
        assert!(StorageError::malformed("luci_profile", "not json").is_corrupt_record());
        assert!(
            StorageError::UnsupportedSchema {
                key: "luci_messages",
                version: 9
            }
            .is_corrupt_record()
        );
        assert!(!StorageError::Keyring("locked".into()).is_corrupt_record());
        assert!(!StorageError::Io(std::io::Error::other("disk full")).is_corrupt_record());
    }

    #[test]
    fn test_display_names_record() {
        let err = StorageError::malformed("luci_profile", "expected object");
        assert_eq!(
            err.to_string(),
            "record 'luci_profile' is malformed: expected object"
        );
    }
}
