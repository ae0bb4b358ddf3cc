//! Read-only listing and aggregate statistics.

use std::sync::Arc;

use crate::domain::entities::{UrlRecord, UrlSummary};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Service backing the admin dashboard.
///
/// Never writes. Aggregates are recomputed from the store on every call.
pub struct StatsService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UrlRepository + ?Sized> StatsService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists all records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_all(&self) -> Result<Vec<UrlRecord>, AppError> {
        self.repository.list_all().await
    }

    /// Computes total URLs, total clicks and average clicks per URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn summary(&self) -> Result<UrlSummary, AppError> {
        let records = self.repository.list_all().await?;
        Ok(UrlSummary::from_records(&records))
    }
}
