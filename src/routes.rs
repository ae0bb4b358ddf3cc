//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect
//! - `GET  /health`      - Health check of the mapping store
//! - `/api/*`            - REST API
//!
//! Unmatched paths and methods get the same JSON error body as handler errors.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Browser access from configured origins
//! - **Rate limiting** - Per-IP token bucket on link creation
//! - **Authentication** - Bearer admin token on deletions
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{
    health_handler, method_not_allowed_handler, not_found_handler, redirect_handler,
};
use crate::api::middleware::{cors, tracing};
use crate::config::{Config, RateLimit};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// HTTP-level settings taken from [`Config`].
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub rate_limit: RateLimit,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl RouterOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rate_limit: config.rate_limit,
            cors_allowed_origins: config.cors_allowed_origins.clone(),
        }
    }
}

impl Default for RouterOptions {
    /// No rate limiting, any origin.
    fn default() -> Self {
        Self {
            rate_limit: RateLimit {
                per_second: 0,
                burst: 0,
                behind_proxy: false,
            },
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// Constructs the application router with all routes and middleware.
///
/// Rate limiting keys on the peer address, so a server with rate limiting
/// enabled must be served with `into_make_service_with_connect_info`.
pub fn app_router(state: AppState, options: &RouterOptions) -> NormalizePath<Router> {
    let api_router = api::routes::routes(state.clone(), options.rate_limit);

    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .with_state(state)
        .layer(cors::layer(&options.cors_allowed_origins))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
