//! DTOs for per-URL statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlStats;

/// Statistics for a single short URL.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub long_url: String,
    pub description: Option<String>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
}

impl From<UrlStats> for StatsResponse {
    fn from(stats: UrlStats) -> Self {
        let is_expired = stats.url.is_expired();
        let url = stats.url;

        Self {
            short_code: url.short_code,
            custom_alias: url.custom_alias,
            long_url: url.long_url,
            description: url.description,
            click_count: stats.click_count,
            created_at: url.created_at,
            is_active: url.is_active,
            expires_at: url.expires_at,
            is_expired,
        }
    }
}
