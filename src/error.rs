//! Application error type and its HTTP representation.
//!
//! Every fallible operation in the service returns [`AppError`]. The variant
//! decides the HTTP status and the stable machine-readable `code` sent to
//! clients; the message is human-readable.
//!
//! # Response Body
//!
//! ```json
//! {
//!   "error": "URL must use http or https",
//!   "code": "invalid_url",
//!   "details": { "url": "ftp://example.com" }
//! }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Constraint names from `migrations/`, used to classify unique violations.
const SHORT_CODE_CONSTRAINT: &str = "urls_short_code_key";
const ORIGINAL_URL_CONSTRAINT: &str = "urls_original_url_key";

/// Serialized error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input. `code` distinguishes `invalid_url` from generic validation.
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
        details: Value,
    },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("method {method} is not allowed here")]
    MethodNotAllowed { method: String },

    /// Per-client quota exceeded; `retry_after` is in seconds.
    #[error("too many requests, retry in {retry_after}s")]
    RateLimited { retry_after: u64 },

    /// Collision on `short_code`. Recovered by regenerating; never meant for clients.
    #[error("short code already exists: {code}")]
    DuplicateCode { code: String },

    /// Another record already maps this URL.
    #[error("URL is already shortened: {original_url}")]
    DuplicateUrl { original_url: String },

    /// Every generated candidate collided.
    #[error("failed to generate a unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            code: "validation_error",
            message: message.into(),
            details,
        }
    }

    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            code: "invalid_url",
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable kind of this error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { code, .. } => code,
            AppError::NotFound { .. } => "not_found",
            AppError::Unauthorized { .. } => "unauthorized",
            AppError::MethodNotAllowed { .. } => "method_not_allowed",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::DuplicateCode { .. } => "internal_error",
            AppError::DuplicateUrl { .. } => "conflict",
            AppError::GenerationExhausted { .. } => "generation_exhausted",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::DuplicateCode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DuplicateUrl { .. } => StatusCode::CONFLICT,
            AppError::GenerationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the client-facing body.
    ///
    /// A leaked `DuplicateCode` is reported as a generic internal error so the
    /// colliding code is not echoed back.
    pub fn to_body(&self) -> ErrorBody {
        let (error, details) = match self {
            AppError::Validation {
                message, details, ..
            }
            | AppError::NotFound { message, details }
            | AppError::Unauthorized { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
            AppError::MethodNotAllowed { method } => {
                (self.to_string(), json!({ "method": method }))
            }
            AppError::RateLimited { retry_after } => {
                (self.to_string(), json!({ "retry_after": retry_after }))
            }
            AppError::DuplicateCode { .. } => ("Internal server error".to_string(), json!({})),
            AppError::DuplicateUrl { original_url } => {
                (self.to_string(), json!({ "original_url": original_url }))
            }
            AppError::GenerationExhausted { attempts } => (
                "Short code space is temporarily exhausted, try again later".to_string(),
                json!({ "attempts": attempts }),
            ),
        };

        ErrorBody {
            error,
            code: self.code(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal errors are logged once, where the underlying failure is converted.
        if status.is_server_error() && !matches!(self, AppError::Internal { .. }) {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        }

        let mut response = (status, Json(self.to_body())).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            match db.constraint() {
                Some(SHORT_CODE_CONSTRAINT) => {
                    return AppError::DuplicateCode {
                        code: String::new(),
                    };
                }
                Some(ORIGINAL_URL_CONSTRAINT) => {
                    return AppError::DuplicateUrl {
                        original_url: String::new(),
                    };
                }
                _ => {}
            }
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
