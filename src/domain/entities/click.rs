//! Click entity representing a single redirect event.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Maximum stored length of the user agent and referer headers.
pub const MAX_HEADER_LEN: usize = 500;

/// Maximum stored length of an IP address (fits IPv6 text form).
pub const MAX_IP_LEN: usize = 45;

/// A click recorded when a short identifier is followed.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Click {
    pub id: i64,
    pub url_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Number of clicks on one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Input data for recording a new click.
///
/// Metadata is optional: clients may omit headers and the service may run
/// without access to the peer address.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub url_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl NewClick {
    /// Creates a click for `url_id` at the current instant, truncating metadata
    /// to the stored column sizes.
    pub fn new(
        url_id: i64,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            url_id,
            clicked_at: Utc::now(),
            ip_address: ip_address.map(|ip| truncate(ip, MAX_IP_LEN)),
            user_agent: user_agent.map(|ua| truncate(ua, MAX_HEADER_LEN)),
            referer: referer.map(|r| truncate(r, MAX_HEADER_LEN)),
        }
    }
}

/// Truncates `value` to at most `max` characters without splitting a code point.
pub fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}
