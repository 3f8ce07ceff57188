//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Keybinding definitions.
pub mod keybinding;
/// Port definitions.
pub mod ports;
/// Serde helpers for persisted records.
pub mod serde_utils;

pub use entities::{ApiKey, AppView, Message, MessageRole, UserProfile};
pub use errors::{AuthError, EngineError, StorageError};
pub use ports::{ChatEnginePort, ChatTurnRequest, RecordKey, StorePort};
