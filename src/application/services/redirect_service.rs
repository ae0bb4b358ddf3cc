//! Short code resolution with click counting.

use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::is_valid_code;
use serde_json::json;
use tracing::debug;

/// Resolves short codes for redirects.
///
/// Lookup and click increment are one atomic store operation, so the counter
/// has advanced before the caller issues the redirect and concurrent requests
/// for the same code each count exactly once.
pub struct RedirectService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UrlRepository + ?Sized> RedirectService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Counts a click on `code` and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or unknown;
    /// nothing is mutated in that case.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, code: &str) -> Result<UrlRecord, AppError> {
        if !is_valid_code(code) {
            return Err(not_found(code));
        }

        let record = self
            .repository
            .increment_clicks(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        metrics::counter!("shortlink_redirects_total").increment(1);
        debug!(code, clicks = record.clicks, "Redirect resolved");

        Ok(record)
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}
