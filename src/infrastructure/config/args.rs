use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "luci",
    version,
    about = "A terminal AI companion you can actually talk to",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding profile, history and credential.
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Gemini model name.
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,

    /// API key, used when none is stored yet.
    #[arg(long, env = "LUCI_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Store the API key in the system keyring.
    #[arg(long)]
    pub keyring: Option<bool>,

    /// Terminal width below which the sidebar becomes a drawer.
    #[arg(long, value_name = "COLUMNS")]
    pub sidebar_breakpoint: Option<u16>,

    /// Accent color (name or hex code).
    #[arg(long)]
    pub accent_color: Option<String>,
}
