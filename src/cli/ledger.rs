//! Ledger inspection commands: `owned` and `invocations`.

use anyhow::{bail, Context, Result};

use devhook::config::Config;
use devhook::devices::DeviceCategory;
use devhook::invocation::InvocationLog;
use devhook::ledger::LedgerStore;

/// Print owned devices as pretty JSON.
pub(crate) fn cmd_owned(device_type: Option<String>) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let store = LedgerStore::from_config(&config)?;

    let category = match device_type {
        None => None,
        Some(raw) => match DeviceCategory::new(&raw) {
            Ok(c) if store.is_known(&c) => Some(c),
            _ => {
                let known: Vec<&str> = store
                    .known_categories()
                    .iter()
                    .map(DeviceCategory::as_str)
                    .collect();
                bail!("Invalid device type. Must be one of {:?}", known);
            }
        },
    };

    let ledger = store.fetch(category.as_ref());
    println!("{}", serde_json::to_string_pretty(&ledger)?);
    Ok(())
}

/// Print the invocation log verbatim.
pub(crate) fn cmd_invocations() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let log = InvocationLog::from_config(&config);
    let content = log
        .read()
        .with_context(|| format!("Failed to read {}", log.path().display()))?;
    if content.is_empty() {
        println!("No invocations logged yet ({})", log.path().display());
    } else {
        print!("{}", content);
    }
    Ok(())
}
