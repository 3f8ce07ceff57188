//! Domain error types.

mod auth_error;
mod engine_error;
mod storage_error;

pub use auth_error::AuthError;
pub use engine_error::EngineError;
pub use storage_error::StorageError;
