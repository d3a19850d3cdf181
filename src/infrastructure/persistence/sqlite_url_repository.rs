//! SQLite implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{NewUrl, UrlRecord, UrlStats};
use crate::domain::repositories::{UrlFilter, UrlRepository};
use crate::error::AppError;
use crate::utils::db_error::map_url_insert_error;

const COLUMNS: &str =
    "id, long_url, short_code, custom_alias, created_at, expires_at, is_active, description";

const STATS_SELECT: &str = r#"
    SELECT u.id, u.long_url, u.short_code, u.custom_alias, u.created_at,
           u.expires_at, u.is_active, u.description,
           (SELECT COUNT(*) FROM url_clicks c WHERE c.url_id = u.id) AS click_count
    FROM urls u
"#;

// SQLite's LIKE is already case-insensitive for ASCII.
const SEARCH_CLAUSE: &str = r#"
    WHERE u.long_url LIKE ?1 ESCAPE '\'
       OR u.short_code LIKE ?1 ESCAPE '\'
       OR u.custom_alias LIKE ?1 ESCAPE '\'
       OR u.description LIKE ?1 ESCAPE '\'
"#;

/// SQLite repository for URL mappings.
///
/// Timestamps are stored as RFC 3339 text in UTC, so string comparison in
/// SQL matches chronological order.
pub struct SqliteUrlRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteUrlRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for SqliteUrlRepository {
    async fn create(&self, new_url: NewUrl) -> Result<UrlRecord, AppError> {
        let sql = format!(
            r#"
            INSERT INTO urls (long_url, short_code, custom_alias, description, created_at, expires_at, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, UrlRecord>(&sql)
            .bind(&new_url.long_url)
            .bind(&new_url.short_code)
            .bind(&new_url.custom_alias)
            .bind(&new_url.description)
            .bind(new_url.created_at)
            .bind(new_url.expires_at)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_url_insert_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM urls WHERE id = ?1");

        let url = sqlx::query_as::<_, UrlRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(url)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM urls WHERE short_code = ?1 OR custom_alias = ?1 ORDER BY id LIMIT 1"
        );

        let url = sqlx::query_as::<_, UrlRecord>(&sql)
            .bind(identifier)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(url)
    }

    async fn find_by_long_url(
        &self,
        long_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UrlRecord>, AppError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS} FROM urls
            WHERE long_url = ?1
              AND is_active = 1
              AND (expires_at IS NULL OR expires_at > ?2)
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#
        );

        let url = sqlx::query_as::<_, UrlRecord>(&sql)
            .bind(long_url)
            .bind(now)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(url)
    }

    async fn update(&self, url: &UrlRecord) -> Result<UrlRecord, AppError> {
        let sql = format!(
            r#"
            UPDATE urls
            SET is_active = ?2, description = ?3, expires_at = ?4
            WHERE id = ?1
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, UrlRecord>(&sql)
            .bind(url.id)
            .bind(url.is_active)
            .bind(&url.description)
            .bind(url.expires_at)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM url_clicks WHERE url_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM urls WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &UrlFilter) -> Result<Vec<UrlStats>, AppError> {
        let sql = format!(
            "{STATS_SELECT} {SEARCH_CLAUSE} ORDER BY u.created_at DESC, u.id DESC LIMIT ?2 OFFSET ?3"
        );

        let rows = sqlx::query_as::<_, UrlStats>(&sql)
            .bind(filter.like_pattern())
            .bind(filter.page_size)
            .bind(filter.offset())
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows)
    }

    async fn count(&self, search: Option<String>) -> Result<i64, AppError> {
        let pattern = UrlFilter::new(1, 1).with_search(search).like_pattern();
        let sql = format!("SELECT COUNT(*) FROM urls u {SEARCH_CLAUSE}");

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(pattern)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE is_active = 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn most_clicked(&self, limit: i64) -> Result<Vec<UrlStats>, AppError> {
        let sql = format!(
            "{STATS_SELECT} ORDER BY click_count DESC, u.created_at DESC, u.id DESC LIMIT ?1"
        );

        let rows = sqlx::query_as::<_, UrlStats>(&sql)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
