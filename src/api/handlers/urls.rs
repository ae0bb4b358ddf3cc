//! Handlers for listing and deleting URLs.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::shorten::UrlResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every stored URL, newest first.
///
/// # Endpoint
///
/// `GET /api/urls`
pub async fn list_urls_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UrlResponse>>, AppError> {
    let records = state.stats_service.list_all().await?;

    let items = records
        .into_iter()
        .map(|record| {
            let short_url = state.link_service.short_url(&record.short_code);
            UrlResponse::from_record(record, short_url)
        })
        .collect();

    Ok(Json(items))
}

/// Deletes a URL by its identifier.
///
/// # Endpoint
///
/// `DELETE /api/urls/{id}`
///
/// Requires `Authorization: Bearer <ADMIN_TOKEN>` when an admin token is configured.
///
/// # Errors
///
/// Returns 404 Not Found if no URL has this identifier.
pub async fn delete_url_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::not_found("URL not found", json!({ "id": id })))?;

    state.link_service.delete_by_id(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
