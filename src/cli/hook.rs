//! `on-device-add` / `on-device-remove` subcommand handler.

use anyhow::{Context, Result};

use devhook::hooks::{run_hook, HookKind};

/// Run one hook and return the exit status the host should see.
pub(crate) fn cmd_hook(hook: HookKind, payload: &str) -> Result<i32> {
    let outcome = run_hook(hook, payload).with_context(|| format!("{} failed to start", hook))?;
    Ok(outcome.exit_code())
}
