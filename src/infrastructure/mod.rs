//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Gemini engine client.
pub mod gemini;
/// Persistent store backends.
pub mod store;

pub use config::{AppConfig, CliArgs, ConfigError, ConfigManager, LogLevel};
pub use gemini::GeminiChatClient;
pub use store::{FileStore, KeyringStore, MemoryStore};
