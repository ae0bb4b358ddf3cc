//! URL record entity representing a short code mapping.

use chrono::{DateTime, Utc};

/// A persisted mapping from a short code to its original URL.
///
/// `short_url` is intentionally absent: it depends on the public base URL and
/// is derived at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        short_code: String,
        original_url: String,
        clicks: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            original_url,
            clicks,
            created_at,
        }
    }
}

/// Input data for inserting a new record.
///
/// The store assigns `id` and `created_at`; `clicks` always starts at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub short_code: String,
    pub original_url: String,
}

impl NewUrlRecord {
    pub fn new(short_code: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            original_url: original_url.into(),
        }
    }
}

/// Aggregate figures over all records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrlSummary {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub average_clicks: f64,
}

impl UrlSummary {
    /// Computes the summary from a set of records.
    ///
    /// The average is `0.0` when there are no records.
    pub fn from_records(records: &[UrlRecord]) -> Self {
        let total_urls = records.len() as i64;
        let total_clicks: i64 = records.iter().map(|r| r.clicks).sum();
        let average_clicks = if total_urls == 0 {
            0.0
        } else {
            total_clicks as f64 / total_urls as f64
        };

        Self {
            total_urls,
            total_clicks,
            average_clicks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, clicks: i64) -> UrlRecord {
        UrlRecord::new(
            id,
            format!("code{id}"),
            format!("https://example.com/{id}"),
            clicks,
            Utc::now(),
        )
    }

    #[test]
    fn test_url_record_creation() {
        let now = Utc::now();
        let rec = UrlRecord::new(
            1,
            "abc1234".to_string(),
            "https://example.com".to_string(),
            0,
            now,
        );

        assert_eq!(rec.id, 1);
        assert_eq!(rec.short_code, "abc1234");
        assert_eq!(rec.original_url, "https://example.com");
        assert_eq!(rec.clicks, 0);
        assert_eq!(rec.created_at, now);
    }

    #[test]
    fn test_new_url_record() {
        let new = NewUrlRecord::new("xyz789A", "https://rust-lang.org/");

        assert_eq!(new.short_code, "xyz789A");
        assert_eq!(new.original_url, "https://rust-lang.org/");
    }

    #[test]
    fn test_summary_empty() {
        let summary = UrlSummary::from_records(&[]);

        assert_eq!(summary.total_urls, 0);
        assert_eq!(summary.total_clicks, 0);
        assert_eq!(summary.average_clicks, 0.0);
    }

    #[test]
    fn test_summary_average() {
        let summary = UrlSummary::from_records(&[record(1, 4), record(2, 0), record(3, 5)]);

        assert_eq!(summary.total_urls, 3);
        assert_eq!(summary.total_clicks, 9);
        assert_eq!(summary.average_clicks, 3.0);
    }
}
