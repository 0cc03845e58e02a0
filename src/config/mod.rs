//! Configuration management for devhook
//!
//! Configuration is loaded from `~/.devhook/config.json` (or the file named by
//! `DEVHOOK_CONFIG`) with environment variable overrides.

mod types;
pub mod validate;

pub use types::*;

use crate::error::{DevhookError, Result};
use std::path::{Path, PathBuf};

impl Config {
    /// Returns the devhook configuration directory path (~/.devhook)
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".devhook")
    }

    /// Returns the path to the config file.
    ///
    /// `DEVHOOK_CONFIG` wins over the default `~/.devhook/config.json`.
    pub fn path() -> PathBuf {
        match std::env::var("DEVHOOK_CONFIG") {
            Ok(val) if !val.trim().is_empty() => PathBuf::from(val),
            _ => Self::dir().join("config.json"),
        }
    }

    /// Load configuration from the default path with environment overrides.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::path())
    }

    /// Load configuration from a specific path with environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| {
                DevhookError::Config(format!("{}: {}", path.display(), e))
            })?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Defaults with environment overrides applied, ignoring any config file.
    ///
    /// Used when the config file itself cannot be loaded but the caller still
    /// needs to know where state lives.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables follow the pattern: DEVHOOK_SECTION_KEY.
    /// Unparsable values are ignored.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("DEVHOOK_STATE_DIR") {
            if !val.trim().is_empty() {
                self.state.dir = PathBuf::from(val);
            }
        }
        if let Some(val) = var("DEVHOOK_LEDGER_WRITE_MODE") {
            if let Ok(mode) = val.parse() {
                self.ledger.write_mode = mode;
            }
        }

        if let Some(val) = var("DEVHOOK_SERVER_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("DEVHOOK_SERVER_PORT") {
            if let Ok(v) = val.parse() {
                self.server.port = v;
            }
        }

        if let Some(val) = var("DEVHOOK_LOGGING_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = var("DEVHOOK_LOGGING_FORMAT") {
            if let Ok(format) = val.parse() {
                self.logging.format = format;
            }
        }
    }
}
