//! Bearer token authentication for admin endpoints.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::{error::AppError, state::AppState};

/// Requires `Authorization: Bearer <ADMIN_TOKEN>` when an admin token is configured.
///
/// Without a configured token the request passes through unchanged.
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if the header
/// is missing, malformed, or carries the wrong token.
///
/// # Example
///
/// ```rust,ignore
/// let admin = Router::new()
///     .route("/urls/{id}", delete(delete_url_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = st.admin_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    if !tokens_match(&token, expected) {
        tracing::warn!(path = %parts.uri.path(), "Rejected admin request with invalid token");
        return Err(AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Invalid token"}),
        ));
    }

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

/// Compares fixed-length digests so the comparison time does not depend on
/// the length of the common prefix.
fn tokens_match(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    provided
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
