//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Storage round trip plus the active configuration

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub healthy: bool,
    pub backend: &'static str,
    pub batch_fetch_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Checks that the store answers a query.
///
/// Returns 200 with the status if healthy, 503 otherwise.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Response {
    let check = state.dataset_repo.is_empty().await;

    let status = HealthStatus {
        healthy: check.is_ok(),
        backend: state.backend,
        batch_fetch_size: state.batch_fetch_size,
        error: check.err().map(|e| e.to_string()),
    };

    if status.healthy {
        (StatusCode::OK, Json(status)).into_response()
    } else {
        tracing::warn!(error = ?status.error, "Health check failed");
        (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
    }
}
