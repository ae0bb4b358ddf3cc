//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL and counts the click.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response
///
/// `302 Found` with `Location` set to the original URL. The click counter is
/// incremented in the same store operation that resolves the code, so every
/// successful redirect is counted exactly once.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.redirect_service.resolve(&code).await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, record.original_url)],
    ))
}
