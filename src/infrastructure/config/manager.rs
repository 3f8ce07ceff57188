use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::AppConfig;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("no config directory on this platform")]
    NoConfigDir,
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot encode default config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Locates `config.toml` and seeds it with defaults on first run.
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `NoConfigDir` if the platform has none.
    pub fn new() -> Result<Self, ConfigError> {
        AppConfig::default_config_dir()
            .map(Self::with_dir)
            .ok_or(ConfigError::NoConfigDir)
    }

    #[must_use]
    pub const fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Reads the config at `path`, or `config.toml` in the config directory.
    ///
    /// A missing file is created with defaults. A file that fails to parse is
    /// left as is and defaults are used.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the default cannot be written.
    pub fn load_config(&self, path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let owned;
        let path = match path {
            Some(path) => path,
            None => {
                owned = self.config_dir.join(CONFIG_FILE_NAME);
                &owned
            }
        };

        if !path.exists() {
            info!(path = %path.display(), "Writing default config");
            let config = AppConfig::default();
            write_config(path, &config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.into(),
            source,
        })?;

        Ok(toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Config does not parse, using defaults");
            AppConfig::default()
        }))
    }
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    let write_error = |source| ConfigError::Write {
        path: path.into(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_error)?;

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    debug!(path = %path.display(), "Config written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("luci");
        let manager = ConfigManager::with_dir(config_dir.clone());

        let config = manager.load_config(None).unwrap();

        assert_eq!(config.ui.sidebar_breakpoint, 80);
        let written = fs::read_to_string(config_dir.join(CONFIG_FILE_NAME)).unwrap();
        assert!(written.contains("sidebar_breakpoint = 80"));
    }

    #[test]
    fn test_unparseable_file_is_kept_and_defaults_used() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf());
        let config_file = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_file, "invalid_toml = [").unwrap();

        let config = manager.load_config(None).unwrap();

        assert!(!config.use_keyring);
        assert_eq!(fs::read_to_string(&config_file).unwrap(), "invalid_toml = [");
    }

    #[test]
    fn test_explicit_path_skips_config_dir() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path().join("unused"));
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[engine]\nmodel = \"gemini-pro\"\n").unwrap();

        let config = manager.load_config(Some(&custom)).unwrap();

        assert_eq!(config.engine.model, "gemini-pro");
        assert!(!dir.path().join("unused").exists());
    }

    #[test]
    fn test_unreadable_path_reports_read_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf());

        let result = manager.load_config(Some(dir.path()));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
