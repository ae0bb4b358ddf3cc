//! Repository trait for the short code mapping store.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// The mapping store: single source of truth for short code mappings.
///
/// Implementations must make every mutation atomic. `insert` and
/// `increment_clicks` on the same code are linearizable; unrelated codes must
/// not block each other.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - In-process sharded map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a new record with `clicks = 0`.
    ///
    /// The record becomes visible to readers only once fully written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the short code is taken.
    /// Returns [`AppError::DuplicateUrl`] if the original URL is already mapped.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Finds a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a record by its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError>;

    /// Finds the record mapping a (normalized) original URL, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Atomically increments `clicks` by exactly one.
    ///
    /// Returns the updated record, or `Ok(None)` without any mutation when the
    /// code does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_clicks(&self, code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Lists every record, newest first (ties broken by id, descending).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_all(&self) -> Result<Vec<UrlRecord>, AppError>;

    /// Removes a record. Returns `Ok(false)` if the code did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
