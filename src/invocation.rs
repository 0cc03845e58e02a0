//! Append-only log of hook invocations.
//!
//! Each line is `<local timestamp>: <argv joined by spaces>`. The log is for
//! people debugging a deployment; nothing reads it back for decisions.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::Config;
use crate::error::{DevhookError, Result};

/// File name inside the state directory.
pub const INVOCATION_LOG_FILE: &str = "device_invocations.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Clone)]
pub struct InvocationLog {
    path: PathBuf,
}

impl InvocationLog {
    /// Log stored as `device_invocations.log` in `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(INVOCATION_LOG_FILE),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.state.dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry stamped with the current local time.
    pub fn record<S: AsRef<str>>(&self, argv: &[S]) -> Result<()> {
        self.record_at(Local::now(), argv)
    }

    pub fn record_at<S: AsRef<str>>(&self, timestamp: DateTime<Local>, argv: &[S]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DevhookError::storage(parent, e))?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| DevhookError::storage(&self.path, e))?;
        file.write_all(format_entry(timestamp, argv).as_bytes())
            .map_err(|e| DevhookError::storage(&self.path, e))?;
        Ok(())
    }

    /// Whole log contents; empty if nothing has been logged yet.
    pub fn read(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(DevhookError::storage(&self.path, e)),
        }
    }
}

/// One log line, newline included.
pub fn format_entry<S: AsRef<str>>(timestamp: DateTime<Local>, argv: &[S]) -> String {
    let args: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
    format!("{}: {}\n", timestamp.format(TIMESTAMP_FORMAT), args.join(" "))
}
