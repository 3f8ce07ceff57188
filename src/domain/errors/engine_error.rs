//! Chat engine error types.

use thiserror::Error;

use super::AuthError;

/// Errors returned by the conversational AI engine.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum EngineError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("network error: {message}")]
    Network { message: String },

    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("invalid response from AI endpoint: {message}")]
    InvalidResponse { message: String },

    #[error("unexpected engine error: {message}")]
    Unexpected { message: String },
}

impl EngineError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether the credential must be discarded.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimited { .. })
    }
}
