//! Configuration type definitions for devhook
//!
//! All types implement serde traits for JSON serialization and have sensible
//! defaults, so an absent or partial config file is always usable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration struct for devhook
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Where ledger files and the invocation log live
    pub state: StateConfig,
    /// Ledger categories and write behavior
    pub ledger: LedgerConfig,
    /// Which devices the add-hook accepts
    pub acceptance: AcceptanceConfig,
    /// Status service bind address
    pub server: ServerConfig,
    /// Logging output
    pub logging: LoggingConfig,
}

// ============================================================================
// State Configuration
// ============================================================================

/// Location of persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Directory holding `current_owned_<category>_devices.json` and
    /// `device_invocations.log`. Defaults to the system temp directory so
    /// ownership does not outlive the hosting environment.
    pub dir: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
        }
    }
}

// ============================================================================
// Ledger Configuration
// ============================================================================

/// How a ledger file is replaced on save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Write a sibling temp file, then rename it over the ledger.
    #[default]
    Atomic,
    /// Truncate and rewrite the ledger in place. A crash mid-write leaves a
    /// corrupt file, which the next load reads as empty.
    Direct,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(WriteMode::Atomic),
            "direct" => Ok(WriteMode::Direct),
            other => Err(format!("unknown write mode '{}'", other)),
        }
    }
}

/// Ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Categories reported when no category is requested, and the only ones
    /// the status service accepts.
    pub categories: Vec<String>,
    /// Save strategy.
    pub write_mode: WriteMode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            categories: vec!["serial".to_string(), "video".to_string()],
            write_mode: WriteMode::Atomic,
        }
    }
}

// ============================================================================
// Acceptance Configuration
// ============================================================================

/// Add-hook acceptance policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceConfig {
    /// Device categories the add-hook takes ownership of.
    pub categories: Vec<String>,
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            categories: vec!["serial".to_string()],
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Status service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// Compact single-line output with targets
    #[default]
    Component,
    /// JSON lines
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "component" => Ok(LogFormat::Component),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Optional file to append JSON logs to
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Component,
            level: "info".to_string(),
            file: None,
        }
    }
}
