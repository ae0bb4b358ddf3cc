//! Handler for aggregate statistics.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns totals across all stored URLs.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// `averageClicks` is `totalClicks / totalUrls`, or `0` when nothing is stored.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let summary = state.stats_service.summary().await?;

    Ok(Json(summary.into()))
}
