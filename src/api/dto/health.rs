//! DTOs for health check endpoint.

use serde::Serialize;

/// Overall service health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// Outcome of a single component check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Ok,
    Error,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: CheckState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Round-trip time of the check.
    pub latency_ms: u64,
}
