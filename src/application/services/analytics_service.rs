//! Click analytics aggregation.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::domain::entities::{Click, UrlRecord, UrlStats};

pub use crate::domain::entities::DailyCount;
use crate::domain::repositories::{ClickRepository, UrlFilter, UrlRepository};
use crate::error::AppError;

pub const SUMMARY_LIST_LIMIT: i64 = 10;
pub const SUMMARY_DAYS: u32 = 7;
pub const DETAIL_CLICK_LIMIT: i64 = 100;
pub const DETAIL_DAYS: u32 = 30;

/// Service-wide analytics.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSummary {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub active_urls: i64,
    /// Newest records.
    pub recent: Vec<UrlStats>,
    /// Records with the most clicks.
    pub popular: Vec<UrlStats>,
    /// Trailing daily click counts, oldest first.
    pub daily: Vec<DailyCount>,
}

/// Analytics for a single record.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlDetail {
    pub url: UrlRecord,
    pub total_clicks: i64,
    /// Most recent clicks, newest first.
    pub recent_clicks: Vec<Click>,
    pub daily: Vec<DailyCount>,
}

/// Service computing aggregate and per-URL analytics.
pub struct AnalyticsService {
    urls: Arc<dyn UrlRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl AnalyticsService {
    pub fn new(urls: Arc<dyn UrlRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { urls, clicks }
    }

    /// Builds the dashboard summary: totals, the 10 newest and 10 most-clicked
    /// records, and daily counts for the last 7 days.
    pub async fn summary(&self) -> Result<AnalyticsSummary, AppError> {
        let today = Utc::now().date_naive();

        let total_urls = self.urls.count(None).await?;
        let active_urls = self.urls.count_active().await?;
        let total_clicks = self.clicks.count(None).await?;

        let recent = self
            .urls
            .list(&UrlFilter::new(1, SUMMARY_LIST_LIMIT))
            .await?;
        let popular = self.urls.most_clicked(SUMMARY_LIST_LIMIT).await?;

        let counted = self
            .clicks
            .daily_counts_since(None, window_start(SUMMARY_DAYS, today))
            .await?;

        Ok(AnalyticsSummary {
            total_urls,
            total_clicks,
            active_urls,
            recent,
            popular,
            daily: daily_counts(&counted, SUMMARY_DAYS, today),
        })
    }

    /// Builds the detail view of one record: its 100 latest clicks, total
    /// clicks, and daily counts for the last 30 days.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn url_detail(&self, id: i64) -> Result<UrlDetail, AppError> {
        let url = self.urls.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        let today = Utc::now().date_naive();

        let total_clicks = self.clicks.count(Some(id)).await?;
        let recent_clicks = self.clicks.recent_for_url(id, DETAIL_CLICK_LIMIT).await?;
        let counted = self
            .clicks
            .daily_counts_since(Some(id), window_start(DETAIL_DAYS, today))
            .await?;

        Ok(UrlDetail {
            url,
            total_clicks,
            recent_clicks,
            daily: daily_counts(&counted, DETAIL_DAYS, today),
        })
    }
}

/// Start of the first day of a `days`-long window ending on `today`.
pub fn window_start(days: u32, today: NaiveDate) -> DateTime<Utc> {
    let back = u64::from(days.saturating_sub(1));
    today
        .checked_sub_days(Days::new(back))
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Spreads per-day counts over the `days` UTC calendar days ending on
/// `today`, oldest first. Days without clicks count zero; days outside the
/// window are ignored.
pub fn daily_counts(counted: &[DailyCount], days: u32, today: NaiveDate) -> Vec<DailyCount> {
    if days == 0 {
        return Vec::new();
    }

    let start = window_start(days, today).date_naive();
    let mut buckets: Vec<DailyCount> = start
        .iter_days()
        .take(days as usize)
        .map(|date| DailyCount { date, count: 0 })
        .collect();

    for day in counted {
        if day.date < start || day.date > today {
            continue;
        }
        let index = (day.date - start).num_days() as usize;
        if let Some(bucket) = buckets.get_mut(index) {
            bucket.count += day.count;
        }
    }

    buckets
}
