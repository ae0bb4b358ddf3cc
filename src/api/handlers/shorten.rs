//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::api::dto::shorten::{ShortenRequest, UrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL, or returns the existing one for an already shortened URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/a/very/long/path?x=1" }
/// ```
///
/// # Response
///
/// `201 Created` for a new mapping, `200 OK` when the URL was already shortened:
///
/// ```json
/// {
///   "_id": "1",
///   "originalUrl": "https://example.com/a/very/long/path?x=1",
///   "shortUrl": "http://localhost:5000/aZ3kP9q",
///   "shortCode": "aZ3kP9q",
///   "clicks": 0,
///   "createdAt": "2025-03-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request` for a malformed body or an invalid URL
/// - `503 Service Unavailable` if no unique code could be generated
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    let Json(payload) = payload?;

    let outcome = state.link_service.shorten(&payload.original_url).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let short_url = state.link_service.short_url(&outcome.record.short_code);

    Ok((
        status,
        Json(UrlResponse::from_record(outcome.record, short_url)),
    ))
}
