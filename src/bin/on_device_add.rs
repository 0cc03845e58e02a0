//! Attach hook. The host calls `on_device_add '<device json>'` and takes
//! ownership of the device only on exit status 0.

use clap::Parser;
use devhook::hooks::{run_hook, HookKind};

#[derive(Parser)]
#[command(name = "on_device_add")]
#[command(version)]
#[command(about = "Decide whether to take ownership of an attached device", long_about = None)]
struct Args {
    /// Device descriptor JSON
    payload: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let outcome = run_hook(HookKind::Add, &args.payload)?;
    std::process::exit(outcome.exit_code());
}
