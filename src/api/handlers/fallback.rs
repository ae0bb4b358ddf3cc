//! Handlers for requests that match no route or no method.

use axum::http::{Method, Uri};
use serde_json::json;

use crate::error::AppError;

/// `404 Not Found` for paths with no route.
pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::not_found("Route not found", json!({ "path": uri.path() }))
}

/// `405 Method Not Allowed` for known paths. Axum adds the `Allow` header.
pub async fn method_not_allowed_handler(method: Method) -> AppError {
    AppError::MethodNotAllowed {
        method: method.to_string(),
    }
}
