//! Error types for devhook
//!
//! This module defines the error type shared by the ledger, the hooks and the
//! status service. Uses `thiserror` for `Display` and `Error` derives.
//!
//! Ownership precondition failures (adding an owned device, removing an
//! unowned one) are not errors: they are reported through
//! [`crate::ledger::AddOutcome`] and [`crate::ledger::RemoveOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for devhook operations.
#[derive(Error, Debug)]
pub enum DevhookError {
    /// Device payload rejected by the schema (or not JSON at all)
    #[error("Payload does not match schema: {0}")]
    Schema(String),

    /// Device category cannot be used to name a ledger file
    #[error("Invalid device category: {0:?}")]
    InvalidCategory(String),

    /// Ledger file could not be written
    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration-related errors (invalid config file, bad override values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DevhookError {
    /// Wrap an I/O failure on a ledger or log file.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DevhookError::Storage {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error means the device payload itself was bad.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DevhookError::Schema(_) | DevhookError::InvalidCategory(_)
        )
    }
}

/// A specialized `Result` type for devhook operations.
pub type Result<T> = std::result::Result<T, DevhookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = DevhookError::Schema("\"serial\" is a required property".to_string());
        assert_eq!(
            err.to_string(),
            "Payload does not match schema: \"serial\" is a required property"
        );
    }

    #[test]
    fn test_storage_error_display_includes_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DevhookError::storage("/tmp/current_owned_serial_devices.json", io_err);
        let msg = err.to_string();
        assert!(msg.contains("/tmp/current_owned_serial_devices.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DevhookError = io_err.into();
        assert!(matches!(err, DevhookError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DevhookError = json_err.into();
        assert!(matches!(err, DevhookError::Json(_)));
    }

    #[test]
    fn test_is_rejection() {
        assert!(DevhookError::Schema("x".into()).is_rejection());
        assert!(DevhookError::InvalidCategory("../x".into()).is_rejection());
        assert!(!DevhookError::Config("x".into()).is_rejection());
        assert!(!DevhookError::Json(serde_json::from_str::<u8>("x").unwrap_err()).is_rejection());
    }

    #[test]
    fn test_invalid_category_display() {
        let err = DevhookError::InvalidCategory("../etc".into());
        assert_eq!(err.to_string(), "Invalid device category: \"../etc\"");
    }
}
