//! DTOs for shortening and listing URLs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::UrlRecord;

/// Request to shorten a single URL.
///
/// ```json
/// { "originalUrl": "https://example.com/a/very/long/path?x=1" }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShortenRequest {
    /// Absolute http(s) URL. Trimmed, checked and normalized by the service.
    pub original_url: String,
}

/// A stored mapping as seen by API clients.
///
/// The identifier is serialized as a string under `_id`.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    #[serde(rename = "_id")]
    #[serde_as(as = "DisplayFromStr")]
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlResponse {
    /// Builds the response for `record`; `short_url` is derived by the caller
    /// from the configured base URL.
    pub fn from_record(record: UrlRecord, short_url: String) -> Self {
        Self {
            id: record.id,
            original_url: record.original_url,
            short_url,
            short_code: record.short_code,
            clicks: record.clicks,
            created_at: record.created_at,
        }
    }
}
