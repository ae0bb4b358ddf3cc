//! PostgreSQL implementation of the mapping store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

const RECORD_COLUMNS: &str = "id, short_code, original_url, clicks, created_at";

#[derive(Debug, sqlx::FromRow)]
struct UrlRow {
    id: i64,
    short_code: String,
    original_url: String,
    clicks: i64,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord::new(
            row.id,
            row.short_code,
            row.original_url,
            row.clicks,
            row.created_at,
        )
    }
}

/// PostgreSQL repository for short code mappings.
///
/// Uniqueness of `short_code` and `original_url` is enforced by table
/// constraints, so concurrent inserts race safely inside the database. Click
/// increments are a single `UPDATE ... RETURNING` statement and rely on
/// row-level locking, never on a read-modify-write in the application.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let sql = format!(
            "INSERT INTO urls (short_code, original_url) VALUES ($1, $2) RETURNING {RECORD_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(&new_record.short_code)
            .bind(&new_record.original_url)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::DuplicateCode { .. } => AppError::DuplicateCode {
                    code: new_record.short_code.clone(),
                },
                AppError::DuplicateUrl { .. } => AppError::DuplicateUrl {
                    original_url: new_record.original_url.clone(),
                },
                other => other,
            })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM urls WHERE short_code = $1");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM urls WHERE id = $1");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM urls WHERE original_url = $1");

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!(
            "UPDATE urls SET clicks = clicks + 1 WHERE short_code = $1 RETURNING {RECORD_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM urls ORDER BY created_at DESC, id DESC");

        let rows = sqlx::query_as::<_, UrlRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE short_code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
