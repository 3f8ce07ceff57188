//! Authentication error types.

use thiserror::Error;

/// Authentication error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum AuthError {
    #[error("credential rejected by the AI endpoint: {message}")]
    Rejected { message: String },

    #[error("no credential available")]
    MissingCredential,
}

impl AuthError {
    /// Creates credential rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}
