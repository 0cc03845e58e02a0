//! devhook - device ownership ledger for container device hooks
//!
//! The host runs `on_device_add` / `on_device_remove` whenever a device is
//! attached or detached. The hooks validate the device descriptor, decide
//! ownership and record owned devices in a per-category ledger file. A small
//! read-only HTTP service reports what is owned.

pub mod api;
pub mod audit;
pub mod config;
pub mod devices;
pub mod error;
pub mod hooks;
pub mod invocation;
pub mod ledger;
pub mod utils;

pub use config::Config;
pub use devices::{DeviceCategory, DeviceDescriptor, DeviceIdentity, LogicalDevice};
pub use error::{DevhookError, Result};
pub use hooks::{HookContext, HookOutcome};
pub use invocation::InvocationLog;
pub use ledger::{AddOutcome, Ledger, LedgerStore, RemoveOutcome};
