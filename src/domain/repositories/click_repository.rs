//! Repository trait for click events.

use crate::domain::entities::{Click, DailyCount, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for recording clicks and querying them for analytics.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::SqliteClickRepository`] - SQLite
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a new click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors, including a
    /// foreign key failure when the mapping was deleted concurrently.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts clicks, for one mapping when `url_id` is set, otherwise in total.
    async fn count(&self, url_id: Option<i64>) -> Result<i64, AppError>;

    /// Returns the most recent clicks of one mapping, newest first.
    async fn recent_for_url(&self, url_id: i64, limit: i64) -> Result<Vec<Click>, AppError>;

    /// Counts clicks at or after `since` per UTC day, optionally for one mapping.
    ///
    /// Only days with at least one click are returned, oldest first.
    async fn daily_counts_since(
        &self,
        url_id: Option<i64>,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AppError>;
}
