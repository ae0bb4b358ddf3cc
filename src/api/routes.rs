//! API route configuration.

use crate::api::handlers::{delete_url_handler, list_urls_handler, shorten_handler, stats_handler};
use crate::api::middleware::{auth, rate_limit};
use crate::config::RateLimit;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `POST   /shorten`     - Shorten a URL (rate limited)
/// - `GET    /urls`        - List all URLs, newest first
/// - `DELETE /urls/{id}`   - Delete a URL (admin token, when configured)
/// - `GET    /stats`       - Aggregate statistics
pub fn routes(state: AppState, rate_limit: RateLimit) -> Router<AppState> {
    let shorten = rate_limit::apply(
        Router::new().route("/shorten", post(shorten_handler)),
        rate_limit,
    );

    let admin = Router::new()
        .route("/urls/{id}", delete(delete_url_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer));

    Router::new()
        .route("/urls", get(list_urls_handler))
        .route("/stats", get(stats_handler))
        .merge(shorten)
        .merge(admin)
}
