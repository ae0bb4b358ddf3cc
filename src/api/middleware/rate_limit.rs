//! Per-IP rate limiting using the token bucket algorithm.

use axum::Router;
use axum::body::Body;
use axum::http::Response;
use axum::response::IntoResponse;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use serde_json::json;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::config::RateLimit;
use crate::error::AppError;

/// Wraps `router` in a rate limiter configured by `limit`.
///
/// Requests exceeding the limit receive `429 Too Many Requests` with the
/// usual JSON error body and a `Retry-After` header. The client
/// is identified by the socket peer address, or by `X-Forwarded-For` /
/// `X-Real-IP` when `behind_proxy` is set. A disabled limit returns the
/// router unchanged.
pub fn apply<S>(router: Router<S>, limit: RateLimit) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !limit.is_enabled() {
        return router;
    }

    if limit.behind_proxy {
        match layer(SmartIpKeyExtractor, limit) {
            Some(layer) => router.layer(layer),
            None => router,
        }
    } else {
        match layer(PeerIpKeyExtractor, limit) {
            Some(layer) => router.layer(layer),
            None => router,
        }
    }
}

fn layer<K>(
    key_extractor: K,
    limit: RateLimit,
) -> Option<GovernorLayer<K, NoOpMiddleware<QuantaInstant>, Body>>
where
    K: KeyExtractor,
{
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(limit.per_second)
        .burst_size(limit.burst)
        .key_extractor(key_extractor)
        .finish();

    match governor_conf {
        Some(conf) => Some(GovernorLayer::new(Arc::new(conf)).error_handler(error_response)),
        None => {
            tracing::warn!(?limit, "Invalid rate limit settings, rate limiting disabled");
            None
        }
    }
}

/// Renders governor rejections as [`AppError`] responses, keeping the
/// governor's rate-limit headers.
fn error_response(error: GovernorError) -> Response<Body> {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            let mut response = AppError::RateLimited {
                retry_after: wait_time,
            }
            .into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => {
            tracing::error!("Rate limiter could not determine the client address");
            AppError::internal("Unable to identify client", json!({})).into_response()
        }
        GovernorError::Other { code, msg, headers } => {
            tracing::error!(%code, ?msg, "Rate limiter rejected request");
            let mut response =
                AppError::internal("Rate limiter failure", json!({})).into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, StatusCode, header};

    #[tokio::test]
    async fn test_rejection_is_json_with_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("4"));

        let response = error_response(GovernorError::TooManyRequests {
            wait_time: 4,
            headers: Some(headers),
        });

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "4");
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "rate_limited");
        assert_eq!(body["details"]["retry_after"], 4);
    }
}
