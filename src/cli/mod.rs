//! CLI module: command parsing and dispatch
//!
//! All CLI logic lives here. `main.rs` calls `cli::run()`.

pub mod config;
pub mod hook;
pub mod ledger;
pub mod serve;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use devhook::hooks::HookKind;

#[derive(Parser)]
#[command(name = "devhook")]
#[command(version)]
#[command(about = "Device ownership ledger for container device hooks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the attach hook for a device payload (exit 0 = take ownership)
    OnDeviceAdd {
        /// Device descriptor JSON
        payload: String,
    },
    /// Run the detach hook for a device payload
    OnDeviceRemove {
        /// Device descriptor JSON
        payload: String,
    },
    /// Print owned devices as JSON
    Owned {
        /// Only this category (serial, video, ...); all categories if omitted
        #[arg(long)]
        device_type: Option<String>,
    },
    /// Print the hook invocation log
    Invocations,
    /// Start the read-only HTTP status service
    Serve {
        /// Bind address (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate configuration file
    Check,
}

/// Main entry point for the CLI.
pub async fn run() -> Result<()> {
    // Initialize logging from config (format, level, optional file output).
    // Fall back to defaults if the config file is missing or unreadable.
    let logging_cfg = devhook::config::Config::load()
        .map(|c| c.logging)
        .unwrap_or_default();
    devhook::utils::logging::init_logging(&logging_cfg);

    let cli = Cli::parse();

    match cli.command {
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            println!();
        }
        Some(Commands::Version) => {
            cmd_version();
        }
        Some(Commands::OnDeviceAdd { payload }) => {
            let code = hook::cmd_hook(HookKind::Add, &payload)?;
            std::process::exit(code);
        }
        Some(Commands::OnDeviceRemove { payload }) => {
            let code = hook::cmd_hook(HookKind::Remove, &payload)?;
            std::process::exit(code);
        }
        Some(Commands::Owned { device_type }) => {
            ledger::cmd_owned(device_type)?;
        }
        Some(Commands::Invocations) => {
            ledger::cmd_invocations()?;
        }
        Some(Commands::Serve { host, port }) => {
            serve::cmd_serve(host, port).await?;
        }
        Some(Commands::Config { action }) => {
            config::cmd_config(action).await?;
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("devhook {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Device ownership ledger for container device hooks");
}
