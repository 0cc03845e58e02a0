//! Detach hook. The host calls `on_device_remove '<device json>'`; the exit
//! status is informational.

use clap::Parser;
use devhook::hooks::{run_hook, HookKind};

#[derive(Parser)]
#[command(name = "on_device_remove")]
#[command(version)]
#[command(about = "Release a detached device from the ownership ledger", long_about = None)]
struct Args {
    /// Device descriptor JSON
    payload: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let outcome = run_hook(HookKind::Remove, &args.payload)?;
    std::process::exit(outcome.exit_code());
}
