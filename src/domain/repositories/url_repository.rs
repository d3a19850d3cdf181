//! Repository trait for the URL mapping store.

use crate::domain::entities::{NewUrl, UrlRecord, UrlStats};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Highest page number a filter will ask for.
pub const MAX_PAGE: i64 = 1_000_000;

/// Search and pagination criteria for listing mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFilter {
    /// Case-insensitive substring matched against URL, code, alias and description.
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: i64,
    pub page_size: i64,
}

impl UrlFilter {
    /// Creates a filter for the given page, clamping the page to `1..=MAX_PAGE`.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            search: None,
            page: page.clamp(1, MAX_PAGE),
            page_size: page_size.max(1),
        }
    }

    /// Adds a search term. Blank terms are ignored.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    /// Row offset for SQL queries.
    pub fn offset(&self) -> i64 {
        self.page
            .saturating_sub(1)
            .max(0)
            .saturating_mul(self.page_size)
    }

    /// The `LIKE` pattern for the search term, with wildcards escaped.
    ///
    /// Without a search term the pattern is `%`, which matches every row
    /// because `long_url` is never NULL.
    pub fn like_pattern(&self) -> String {
        match &self.search {
            Some(term) => format!("%{}%", escape_like(term)),
            None => "%".to_string(),
        }
    }
}

/// Escapes `LIKE` metacharacters using `\` as the escape character.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository interface for shortened URL mappings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::SqliteUrlRepository`] - SQLite
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateAlias`] or [`AppError::DuplicateCode`] when
    /// the corresponding unique constraint rejects the insert.
    /// Returns [`AppError::Persistence`] on other database errors.
    async fn create(&self, new_url: NewUrl) -> Result<UrlRecord, AppError>;

    /// Finds a mapping by its numeric id.
    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a mapping whose short code or custom alias equals `identifier`.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds the newest mapping for `long_url` that is active and not expired at `now`.
    ///
    /// Used for deduplication on creation.
    async fn find_by_long_url(
        &self,
        long_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UrlRecord>, AppError>;

    /// Persists the mutable fields of `url` (`is_active`, `description`, `expires_at`).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record no longer exists.
    async fn update(&self, url: &UrlRecord) -> Result<UrlRecord, AppError>;

    /// Deletes a mapping and all of its clicks in one transaction.
    ///
    /// Returns `Ok(false)` if no mapping had this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Lists mappings newest-first with their click counts.
    async fn list(&self, filter: &UrlFilter) -> Result<Vec<UrlStats>, AppError>;

    /// Counts mappings matching the optional search term.
    async fn count(&self, search: Option<String>) -> Result<i64, AppError>;

    /// Counts mappings with `is_active = true`.
    async fn count_active(&self) -> Result<i64, AppError>;

    /// Returns the mappings with the most clicks, ties broken newest-first.
    async fn most_clicked(&self, limit: i64) -> Result<Vec<UrlStats>, AppError>;

    /// Checks database connectivity.
    async fn ping(&self) -> Result<(), AppError>;
}
