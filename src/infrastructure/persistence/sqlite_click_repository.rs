//! SQLite implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{Click, DailyCount, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// SQLite repository for click events.
pub struct SqliteClickRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteClickRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for SqliteClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let click = sqlx::query_as::<_, Click>(
            r#"
            INSERT INTO url_clicks (url_id, clicked_at, ip_address, user_agent, referer)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, url_id, clicked_at, ip_address, user_agent, referer
            "#,
        )
        .bind(new_click.url_id)
        .bind(new_click.clicked_at)
        .bind(&new_click.ip_address)
        .bind(&new_click.user_agent)
        .bind(&new_click.referer)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(click)
    }

    async fn count(&self, url_id: Option<i64>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM url_clicks WHERE (?1 IS NULL OR url_id = ?1)",
        )
        .bind(url_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn recent_for_url(&self, url_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let clicks = sqlx::query_as::<_, Click>(
            r#"
            SELECT id, url_id, clicked_at, ip_address, user_agent, referer
            FROM url_clicks
            WHERE url_id = ?1
            ORDER BY clicked_at DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(url_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }

    async fn daily_counts_since(
        &self,
        url_id: Option<i64>,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AppError> {
        // Timestamps are stored as RFC 3339 text; date() normalises the offset to UTC.
        let counts = sqlx::query_as::<_, DailyCount>(
            r#"
            SELECT date(clicked_at) AS date, COUNT(*) AS count
            FROM url_clicks
            WHERE clicked_at >= ?2 AND (?1 IS NULL OR url_id = ?1)
            GROUP BY date(clicked_at)
            ORDER BY date
            "#,
        )
        .bind(url_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(counts)
    }
}
