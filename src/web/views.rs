//! Display rows for the HTML templates.
//!
//! Everything is formatted here so templates only print strings and loop.

use chrono::{DateTime, Utc};

use crate::application::services::{CreateOutcome, DailyCount};
use crate::domain::entities::{Click, UrlRecord, UrlStats};
use crate::utils::request_meta::RequestOrigin;

const LONG_URL_PREVIEW: usize = 60;

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn preview(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Result panel shown after a successful submission.
#[derive(Debug, Clone)]
pub struct CreatedView {
    pub short_url: String,
    pub long_url: String,
    pub existing: bool,
    pub expires_at: Option<String>,
}

impl CreatedView {
    pub fn new(outcome: &CreateOutcome, origin: &RequestOrigin) -> Self {
        let record = &outcome.record;
        Self {
            short_url: origin.short_url(record.identifier()),
            long_url: record.long_url.clone(),
            existing: outcome.existing,
            expires_at: record.expires_at.as_ref().map(format_timestamp),
        }
    }
}

/// One record in a table.
#[derive(Debug, Clone)]
pub struct UrlRow {
    pub id: i64,
    pub identifier: String,
    pub short_url: String,
    pub long_url: String,
    pub long_url_preview: String,
    pub description: String,
    pub created_at: String,
    pub expires_at: String,
    pub is_active: bool,
    /// `active`, `inactive` or `expired`; also the CSS modifier.
    pub status: &'static str,
    pub click_count: i64,
}

impl UrlRow {
    pub fn new(url: &UrlRecord, click_count: i64, origin: &RequestOrigin) -> Self {
        let status = if !url.is_active {
            "inactive"
        } else if url.is_expired() {
            "expired"
        } else {
            "active"
        };

        Self {
            id: url.id,
            identifier: url.identifier().to_string(),
            short_url: origin.short_url(url.identifier()),
            long_url: url.long_url.clone(),
            long_url_preview: preview(&url.long_url, LONG_URL_PREVIEW),
            description: url.description.clone().unwrap_or_default(),
            created_at: format_timestamp(&url.created_at),
            expires_at: url
                .expires_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| "Never".to_string()),
            is_active: url.is_active,
            status,
            click_count,
        }
    }

    pub fn from_stats(stats: &UrlStats, origin: &RequestOrigin) -> Self {
        Self::new(&stats.url, stats.click_count, origin)
    }
}

/// One recorded click.
#[derive(Debug, Clone)]
pub struct ClickRow {
    pub clicked_at: String,
    pub ip_address: String,
    pub user_agent: String,
    pub referer: String,
}

impl From<&Click> for ClickRow {
    fn from(click: &Click) -> Self {
        let or_dash = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("-")
                .to_string()
        };

        Self {
            clicked_at: format_timestamp(&click.clicked_at),
            ip_address: or_dash(&click.ip_address),
            user_agent: or_dash(&click.user_agent),
            referer: or_dash(&click.referer),
        }
    }
}

/// One bar of a daily click chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBar {
    pub label: String,
    pub count: i64,
    /// Bar height relative to the busiest day, 0-100.
    pub percent: i64,
}

pub fn day_bars(daily: &[DailyCount]) -> Vec<DayBar> {
    let max = daily.iter().map(|d| d.count).max().unwrap_or(0);

    daily
        .iter()
        .map(|d| DayBar {
            label: d.date.format("%b %d").to_string(),
            count: d.count,
            percent: if max == 0 { 0 } else { d.count * 100 / max },
        })
        .collect()
}
