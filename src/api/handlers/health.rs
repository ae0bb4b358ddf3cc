//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};
use std::time::Instant;

use crate::api::dto::health::{CheckState, CheckStatus, HealthChecks, HealthResponse, ServiceStatus};
use crate::state::AppState;

/// Reports whether the mapping store is reachable.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: store reachable
/// - **503 Service Unavailable**: store check failed
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Connected", "latency_ms": 1 }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = check_storage(&state).await;

    let (status, code) = match storage.status {
        CheckState::Ok => (ServiceStatus::Healthy, StatusCode::OK),
        CheckState::Error => (ServiceStatus::Degraded, StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks { storage },
    };

    (code, Json(response))
}

async fn check_storage(state: &AppState) -> CheckStatus {
    let started = Instant::now();
    let result = state.repository.ping().await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(()) => CheckStatus {
            status: CheckState::Ok,
            message: Some("Connected".to_string()),
            latency_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            CheckStatus {
                status: CheckState::Error,
                message: Some(format!("Storage error: {}", e)),
                latency_ms,
            }
        }
    }
}
