//! Read-only HTTP status service.
//!
//! Serves:
//! - `GET /alive` → 200 `I am alive!`
//! - `GET /owned_devices?device_type=<cat>` → 200 with the category's ledger,
//!   or the union of all known categories when `device_type` is omitted;
//!   400 `{"message": ...}` for a category the store does not know
//! - `GET /invocation_logs` → 200 `{"invocation_log": "<log contents>"}`
//!
//! Handlers never write: the hooks are the only writers of ledger state.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::devices::DeviceCategory;
use crate::error::Result;
use crate::invocation::InvocationLog;
use crate::ledger::LedgerStore;

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    store: Arc<LedgerStore>,
    invocations: Arc<InvocationLog>,
}

impl ApiState {
    pub fn new(store: LedgerStore, invocations: InvocationLog) -> Self {
        Self {
            store: Arc::new(store),
            invocations: Arc::new(invocations),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            LedgerStore::from_config(config)?,
            InvocationLog::from_config(config),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct OwnedDevicesQuery {
    device_type: Option<String>,
}

/// Build the service router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/alive", get(alive))
        .route("/owned_devices", get(owned_devices))
        .route("/invocation_logs", get(invocation_logs))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn alive() -> &'static str {
    "I am alive!"
}

async fn owned_devices(
    State(state): State<ApiState>,
    Query(query): Query<OwnedDevicesQuery>,
) -> Response {
    let category = match query.device_type {
        None => None,
        Some(raw) => {
            info!(device_type = %raw, "owned devices requested");
            match DeviceCategory::new(&raw) {
                Ok(category) if state.store.is_known(&category) => Some(category),
                _ => return invalid_device_type(&state.store),
            }
        }
    };

    Json(state.store.fetch(category.as_ref())).into_response()
}

fn invalid_device_type(store: &LedgerStore) -> Response {
    let known: Vec<&str> = store
        .known_categories()
        .iter()
        .map(DeviceCategory::as_str)
        .collect();
    let message = format!("Invalid device type. Must be one of {:?}", known);
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

async fn invocation_logs(State(state): State<ApiState>) -> Response {
    match state.invocations.read() {
        Ok(log) => Json(json!({ "invocation_log": log })).into_response(),
        Err(e) => {
            warn!(error = %e, "could not read invocation log");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(host: &str, port: u16, state: ApiState) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Status service listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Status service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
