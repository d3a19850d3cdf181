//! PostgreSQL implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, DailyCount, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// PostgreSQL repository for click events.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let click = sqlx::query_as::<_, Click>(
            r#"
            INSERT INTO url_clicks (url_id, clicked_at, ip_address, user_agent, referer)
            VALUES ($1, $2, $3, $4, $5)
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
            "SELECT COUNT(*) FROM url_clicks WHERE ($1::bigint IS NULL OR url_id = $1)",
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
            WHERE url_id = $1
            ORDER BY clicked_at DESC, id DESC
            LIMIT $2
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
        let counts = sqlx::query_as::<_, DailyCount>(
            r#"
            SELECT (clicked_at AT TIME ZONE 'UTC')::date AS date, COUNT(*) AS count
            FROM url_clicks
            WHERE clicked_at >= $2 AND ($1::bigint IS NULL OR url_id = $1)
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(url_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(counts)
    }
}
