//! DTOs for aggregate statistics.

use serde::Serialize;

use crate::domain::entities::UrlSummary;

/// Aggregates over all stored URLs.
///
/// ```json
/// { "totalUrls": 3, "totalClicks": 7, "averageClicks": 2.3333333333333335 }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub average_clicks: f64,
}

impl From<UrlSummary> for StatsResponse {
    fn from(summary: UrlSummary) -> Self {
        Self {
            total_urls: summary.total_urls,
            total_clicks: summary.total_clicks,
            average_clicks: summary.average_clicks,
        }
    }
}
