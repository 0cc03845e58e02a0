//! `serve` command handler.

use anyhow::{Context, Result};

use devhook::api::{serve, ApiState};
use devhook::config::Config;

/// Start the status service; CLI flags override `server.host` / `server.port`.
pub(crate) async fn cmd_serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let state = ApiState::from_config(&config)?;
    serve(&host, port, state)
        .await
        .with_context(|| format!("Status service on {}:{} failed", host, port))?;
    Ok(())
}
