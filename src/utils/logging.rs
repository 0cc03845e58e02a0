//! Logging initialization for devhook.
//!
//! Supports three formats:
//! - `pretty`: default tracing pretty-print (human-readable, coloured)
//! - `component`: `[timestamp] [LEVEL] target message {fields}`, compact and grep-friendly;
//!   use the [`log_component!`] macro to add a `component` field for per-subsystem filtering
//! - `json`: structured JSON lines for log aggregators (e.g. Loki, CloudWatch)
//!
//! Text output always goes to stderr. Stdout belongs to command output
//! (`devhook owned` prints JSON there).

use std::sync::Mutex;

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the global tracing subscriber from config.
///
/// Call this once at startup before any tracing events are emitted.
/// Falls back to `RUST_LOG` env var; if unset, uses `cfg.level`.
/// A second call is a no-op.
pub fn init_logging(cfg: &LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match cfg.format {
        LogFormat::Json => {
            let file = cfg.file.as_deref().map(|path| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| (path.to_string(), e))
            });
            match file {
                Some(Ok(file)) => {
                    let _ = tracing_subscriber::fmt()
                        .json()
                        .with_env_filter(filter)
                        .with_writer(Mutex::new(file))
                        .try_init();
                }
                other => {
                    let _ = tracing_subscriber::fmt()
                        .json()
                        .with_env_filter(filter)
                        .with_writer(std::io::stderr)
                        .try_init();
                    if let Some(Err((path, e))) = other {
                        tracing::warn!(path = %path, error = %e, "failed to open log file, logging to stderr");
                    }
                }
            }
        }
        LogFormat::Pretty => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .pretty()
                .try_init();
        }
        // Component-tagged events are emitted via the `log_component!` macro
        // which adds a structured `component` field.
        LogFormat::Component => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact()
                .try_init();
        }
    }
}

/// Emit a component-tagged tracing event.
///
/// Works with any tracing level (`trace`, `debug`, `info`, `warn`, `error`).
/// The `component` field makes it easy to grep logs by subsystem:
///
/// ```
/// # use devhook::log_component;
/// log_component!(info, "ledger", "device owned");
/// log_component!(warn, "api", "unknown device type", status = 400u16);
/// ```
#[macro_export]
macro_rules! log_component {
    ($level:ident, $component:expr, $msg:expr) => {
        tracing::$level!(component = $component, $msg)
    };
    ($level:ident, $component:expr, $msg:expr, $($key:ident = $val:expr),+ $(,)?) => {
        tracing::$level!(component = $component, $($key = $val,)+ $msg)
    };
}
