//! Application configuration.

pub mod app_config;
pub mod args;
pub mod manager;

pub use app_config::{AppConfig, EngineConfig, LogLevel, ThemeConfig, UiConfig};
pub use args::CliArgs;
pub use manager::{ConfigError, ConfigManager};
