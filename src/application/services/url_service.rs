//! Short URL creation, resolution and management service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics::counter;

use crate::domain::entities::url::{MAX_DESCRIPTION_LEN, MAX_LONG_URL_LEN};
use crate::domain::entities::{NewClick, NewUrl, UrlRecord, UrlStats};
use crate::domain::repositories::{ClickRepository, UrlFilter, UrlRepository};
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code};
use crate::utils::request_meta::ClientInfo;
use crate::utils::url_validator::{is_reserved_alias, validate_alias, validate_url};

/// Attempts at drawing a free short code before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Longest accepted lifetime, in days. Keeps `expires_at` within four-digit
/// years so stored timestamps keep sorting chronologically.
pub const MAX_EXPIRATION_DAYS: i64 = 36_500;

/// Input of the creation workflow, as submitted by a form or the JSON API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUrl {
    pub long_url: String,
    pub alias: Option<String>,
    pub description: Option<String>,
    /// Lifetime in days, as submitted. Blank means never expires.
    pub expires_in: Option<String>,
}

/// Result of the creation workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOutcome {
    pub record: UrlRecord,
    /// True when an active record for the same URL was returned instead of
    /// creating a new one.
    pub existing: bool,
}

/// One page of results plus the totals needed to render pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.total == 0 {
            1
        } else {
            (self.total + self.page_size - 1) / self.page_size
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// Service for creating, resolving and managing short URLs.
///
/// Both repositories are injected so the service runs unchanged on
/// PostgreSQL, SQLite, or mocks.
pub struct UrlService {
    urls: Arc<dyn UrlRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl UrlService {
    /// Creates a new URL service.
    pub fn new(urls: Arc<dyn UrlRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { urls, clicks }
    }

    /// Runs the creation workflow.
    ///
    /// # Order of checks
    ///
    /// 1. URL format, URL length, description length
    /// 2. Alias format and reserved words
    /// 3. Alias availability (against both aliases and short codes)
    /// 4. Deduplication: an active, unexpired record with the same URL is
    ///    returned as-is with `existing = true`
    /// 5. Expiration period
    /// 6. Short code allocation and insert
    ///
    /// # Errors
    ///
    /// Returns the validation error of the first failing check,
    /// [`AppError::DuplicateAlias`] / [`AppError::DuplicateCode`] when a
    /// uniqueness race is lost, [`AppError::AllocationExhausted`] when no free
    /// code was found, and [`AppError::Persistence`] on database errors.
    pub async fn create_short_url(&self, input: CreateUrl) -> Result<CreateOutcome, AppError> {
        let long_url = validate_url(&input.long_url)?;
        if long_url.chars().count() > MAX_LONG_URL_LEN {
            return Err(AppError::Validation(format!(
                "URL must be at most {MAX_LONG_URL_LEN} characters"
            )));
        }

        let description = normalize_optional(input.description);
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(AppError::Validation(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        let alias = normalize_optional(input.alias);
        if let Some(alias) = &alias {
            if !validate_alias(alias) || is_reserved_alias(alias) {
                return Err(AppError::InvalidAlias);
            }

            if self.urls.find_by_identifier(alias).await?.is_some() {
                return Err(AppError::DuplicateAlias);
            }
        }

        let now = Utc::now();
        if let Some(record) = self.urls.find_by_long_url(&long_url, now).await? {
            tracing::debug!(id = record.id, "Returning existing short URL");
            return Ok(CreateOutcome {
                record,
                existing: true,
            });
        }

        let expires_at = parse_expiration(input.expires_in.as_deref(), now)?;
        let short_code = self.allocate_code().await?;

        let record = self
            .urls
            .create(NewUrl {
                long_url,
                short_code,
                custom_alias: alias,
                description,
                created_at: now,
                expires_at,
            })
            .await?;

        counter!("urls_created_total").increment(1);
        tracing::info!(id = record.id, identifier = record.identifier(), "Short URL created");

        Ok(CreateOutcome {
            record,
            existing: false,
        })
    }

    /// Draws a short code that collides with no stored code or alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllocationExhausted`] after 10 colliding draws.
    pub async fn allocate_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_code(DEFAULT_CODE_LENGTH);

            if self.urls.find_by_identifier(&code).await?.is_none() {
                return Ok(code);
            }

            tracing::debug!("Short code collision, retrying");
        }

        Err(AppError::AllocationExhausted)
    }

    /// Resolves `identifier` for a redirect and records the visit.
    ///
    /// Click recording is best-effort: a failure is logged and counted but
    /// the destination is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`], [`AppError::Deactivated`] or
    /// [`AppError::Expired`]; no click is recorded in those cases.
    pub async fn follow(&self, identifier: &str, client: &ClientInfo) -> Result<String, AppError> {
        let url = self
            .urls
            .find_by_identifier(identifier)
            .await?
            .ok_or(AppError::NotFound)?;

        if !url.is_active {
            return Err(AppError::Deactivated);
        }
        if url.is_expired() {
            return Err(AppError::Expired);
        }

        let click = NewClick::new(
            url.id,
            client.ip.as_deref(),
            client.user_agent.as_deref(),
            client.referer.as_deref(),
        );

        match self.clicks.record_click(click).await {
            Ok(_) => counter!("clicks_recorded_total").increment(1),
            Err(e) => {
                counter!("click_record_failures_total").increment(1);
                tracing::error!(url_id = url.id, error = %e, "Failed to record click");
            }
        }

        Ok(url.long_url)
    }

    /// Retrieves a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn get(&self, id: i64) -> Result<UrlRecord, AppError> {
        self.urls.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    /// Retrieves a record and its click count by short code or alias.
    pub async fn stats(&self, identifier: &str) -> Result<UrlStats, AppError> {
        let url = self
            .urls
            .find_by_identifier(identifier)
            .await?
            .ok_or(AppError::NotFound)?;

        let click_count = self.clicks.count(Some(url.id)).await?;

        Ok(UrlStats { url, click_count })
    }

    /// Lists records newest-first, filtered and paginated.
    pub async fn list(&self, filter: UrlFilter) -> Result<Page<UrlStats>, AppError> {
        let items = self.urls.list(&filter).await?;
        let total = self.urls.count(filter.search.clone()).await?;

        Ok(Page {
            items,
            page: filter.page,
            page_size: filter.page_size,
            total,
        })
    }

    /// Flips `is_active` and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn toggle(&self, id: i64) -> Result<UrlRecord, AppError> {
        let mut url = self.get(id).await?;
        url.is_active = !url.is_active;

        let updated = self.urls.update(&url).await?;
        tracing::info!(id, is_active = updated.is_active, "Short URL toggled");

        Ok(updated)
    }

    /// Deletes a record with all its clicks and returns what was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn delete(&self, id: i64) -> Result<UrlRecord, AppError> {
        let url = self.get(id).await?;

        if !self.urls.delete(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(id, "Short URL deleted");
        Ok(url)
    }

    /// Checks that the mapping store is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.urls.ping().await
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Turns a submitted lifetime in days into an absolute expiry.
///
/// Blank input never expires. The expiry is `now` plus exactly `days × 24h`.
///
/// # Errors
///
/// Returns [`AppError::InvalidExpiration`] for unparsable, zero, negative,
/// or values above [`MAX_EXPIRATION_DAYS`].
pub fn parse_expiration(
    raw: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    let days: i64 = raw.parse().map_err(|_| AppError::InvalidExpiration)?;
    if !(1..=MAX_EXPIRATION_DAYS).contains(&days) {
        return Err(AppError::InvalidExpiration);
    }

    Duration::try_days(days)
        .and_then(|period| now.checked_add_signed(period))
        .map(Some)
        .ok_or(AppError::InvalidExpiration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Click;
    use crate::domain::entities::url::fixtures::record;
    use crate::domain::repositories::{MockClickRepository, MockUrlRepository};

    fn service(urls: MockUrlRepository, clicks: MockClickRepository) -> UrlService {
        UrlService::new(Arc::new(urls), Arc::new(clicks))
    }

    fn input(url: &str) -> CreateUrl {
        CreateUrl {
            long_url: url.to_string(),
            ..Default::default()
        }
    }

    fn echo_created(mock: &mut MockUrlRepository) {
        mock.expect_create().times(1).returning(|new_url| {
            Ok(UrlRecord {
                id: 42,
                long_url: new_url.long_url,
                short_code: new_url.short_code,
                custom_alias: new_url.custom_alias,
                created_at: new_url.created_at,
                expires_at: new_url.expires_at,
                is_active: true,
                description: new_url.description,
            })
        });
    }

    fn click_for(new_click: NewClick) -> Click {
        Click {
            id: 1,
            url_id: new_click.url_id,
            clicked_at: new_click.clicked_at,
            ip_address: new_click.ip_address,
            user_agent: new_click.user_agent,
            referer: new_click.referer,
        }
    }

    #[tokio::test]
    async fn test_create_generates_code() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_long_url()
            .withf(|url, _| url == "https://example.com")
            .times(1)
            .returning(|_, _| Ok(None));
        urls.expect_find_by_identifier()
            .times(1)
            .returning(|_| Ok(None));
        echo_created(&mut urls);

        let outcome = service(urls, MockClickRepository::new())
            .create_short_url(input("example.com"))
            .await
            .unwrap();

        assert!(!outcome.existing);
        assert_eq!(outcome.record.long_url, "https://example.com");
        assert_eq!(outcome.record.short_code.len(), DEFAULT_CODE_LENGTH);
        assert!(outcome.record.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_create_returns_existing_record() {
        let mut urls = MockUrlRepository::new();
        let existing = record(5, "exist1", "https://example.com");
        urls.expect_find_by_long_url()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        urls.expect_create().times(0);

        let outcome = service(urls, MockClickRepository::new())
            .create_short_url(input("https://example.com"))
            .await
            .unwrap();

        assert!(outcome.existing);
        assert_eq!(outcome.record.id, 5);
    }

    #[tokio::test]
    async fn test_create_with_alias_keeps_generated_code() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_identifier()
            .times(2)
            .returning(|_| Ok(None));
        urls.expect_find_by_long_url().returning(|_, _| Ok(None));
        echo_created(&mut urls);

        let outcome = service(urls, MockClickRepository::new())
            .create_short_url(CreateUrl {
                long_url: "https://example.com/a".to_string(),
                alias: Some(" my-link ".to_string()),
                description: Some("  ".to_string()),
                expires_in: Some("7".to_string()),
            })
            .await
            .unwrap();

        let record = outcome.record;
        assert_eq!(record.custom_alias.as_deref(), Some("my-link"));
        assert_eq!(record.identifier(), "my-link");
        assert_eq!(record.short_code.len(), DEFAULT_CODE_LENGTH);
        assert!(record.description.is_none());
        assert_eq!(
            record.expires_at.unwrap() - record.created_at,
            Duration::days(7)
        );
    }

    #[tokio::test]
    async fn test_create_rejects_taken_alias() {
        let mut urls = MockUrlRepository::new();
        let taken = record(1, "taken1", "https://other.com");
        urls.expect_find_by_identifier()
            .withf(|id| id == "taken1")
            .times(1)
            .returning(move |_| Ok(Some(taken.clone())));
        urls.expect_find_by_long_url().times(0);
        urls.expect_create().times(0);

        let result = service(urls, MockClickRepository::new())
            .create_short_url(CreateUrl {
                alias: Some("taken1".to_string()),
                ..input("https://example.com")
            })
            .await;

        assert!(matches!(result, Err(AppError::DuplicateAlias)));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_and_reserved_alias() {
        for alias in ["ab", "bad alias", "manage"] {
            let result = service(MockUrlRepository::new(), MockClickRepository::new())
                .create_short_url(CreateUrl {
                    alias: Some(alias.to_string()),
                    ..input("https://example.com")
                })
                .await;

            assert!(matches!(result, Err(AppError::InvalidAlias)), "{alias}");
        }
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input_before_storage() {
        let svc = service(MockUrlRepository::new(), MockClickRepository::new());

        assert!(matches!(
            svc.create_short_url(input("")).await,
            Err(AppError::EmptyInput)
        ));
        assert!(matches!(
            svc.create_short_url(input("javascript:alert(1)")).await,
            Err(AppError::DisallowedScheme)
        ));

        let long = format!("https://example.com/{}", "a".repeat(MAX_LONG_URL_LEN));
        assert!(matches!(
            svc.create_short_url(input(&long)).await,
            Err(AppError::Validation(_))
        ));

        let result = svc
            .create_short_url(CreateUrl {
                description: Some("d".repeat(MAX_DESCRIPTION_LEN + 1)),
                ..input("https://example.com")
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_expiration() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_long_url().returning(|_, _| Ok(None));
        urls.expect_create().times(0);
        let svc = service(urls, MockClickRepository::new());

        for expires_in in ["0", "-3", "soon", "99999999999999"] {
            let result = svc
                .create_short_url(CreateUrl {
                    expires_in: Some(expires_in.to_string()),
                    ..input("https://example.com")
                })
                .await;

            assert!(
                matches!(result, Err(AppError::InvalidExpiration)),
                "{expires_in}"
            );
        }
    }

    #[tokio::test]
    async fn test_allocate_code_retries_on_collision() {
        let mut urls = MockUrlRepository::new();
        let mut calls = 0;
        urls.expect_find_by_identifier()
            .times(3)
            .returning(move |code| {
                calls += 1;
                if calls < 3 {
                    Ok(Some(record(1, code, "https://example.com")))
                } else {
                    Ok(None)
                }
            });

        let code = service(urls, MockClickRepository::new())
            .allocate_code()
            .await
            .unwrap();

        assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
    }

    #[tokio::test]
    async fn test_allocate_code_gives_up() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_identifier()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|code| Ok(Some(record(1, code, "https://example.com"))));

        let result = service(urls, MockClickRepository::new())
            .allocate_code()
            .await;

        assert!(matches!(result, Err(AppError::AllocationExhausted)));
    }

    #[tokio::test]
    async fn test_follow_records_click() {
        let mut urls = MockUrlRepository::new();
        let target = record(7, "abc123", "https://example.com/target");
        urls.expect_find_by_identifier()
            .returning(move |_| Ok(Some(target.clone())));

        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .withf(|c| c.url_id == 7 && c.ip_address.as_deref() == Some("10.0.0.1"))
            .times(1)
            .returning(|c| Ok(click_for(c)));

        let client = ClientInfo {
            ip: Some("10.0.0.1".to_string()),
            ..Default::default()
        };
        let long_url = service(urls, clicks)
            .follow("abc123", &client)
            .await
            .unwrap();

        assert_eq!(long_url, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_follow_swallows_click_failure() {
        let mut urls = MockUrlRepository::new();
        let target = record(7, "abc123", "https://example.com");
        urls.expect_find_by_identifier()
            .returning(move |_| Ok(Some(target.clone())));

        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .times(1)
            .returning(|_| Err(AppError::Persistence(sqlx::Error::PoolTimedOut)));

        let result = service(urls, clicks)
            .follow("abc123", &ClientInfo::default())
            .await;

        assert_eq!(result.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn test_follow_refuses_inactive_and_expired() {
        let mut inactive = record(1, "off123", "https://example.com");
        inactive.is_active = false;
        let mut expired = record(2, "old123", "https://example.com");
        expired.expires_at = Some(Utc::now() - Duration::hours(1));

        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_identifier().returning(move |id| {
            Ok(match id {
                "off123" => Some(inactive.clone()),
                "old123" => Some(expired.clone()),
                _ => None,
            })
        });
        let mut clicks = MockClickRepository::new();
        clicks.expect_record_click().times(0);

        let svc = service(urls, clicks);
        let client = ClientInfo::default();

        assert!(matches!(
            svc.follow("off123", &client).await,
            Err(AppError::Deactivated)
        ));
        assert!(matches!(
            svc.follow("old123", &client).await,
            Err(AppError::Expired)
        ));
        assert!(matches!(
            svc.follow("nope", &client).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_toggle_flips_state() {
        let mut urls = MockUrlRepository::new();
        let current = record(3, "abc123", "https://example.com");
        urls.expect_find_by_id()
            .returning(move |_| Ok(Some(current.clone())));
        urls.expect_update()
            .withf(|u| !u.is_active)
            .times(1)
            .returning(|u| Ok(u.clone()));

        let updated = service(urls, MockClickRepository::new())
            .toggle(3)
            .await
            .unwrap();

        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_id().returning(|_| Ok(None));
        urls.expect_delete().times(0);

        let result = service(urls, MockClickRepository::new()).delete(99).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_builds_page() {
        let mut urls = MockUrlRepository::new();
        urls.expect_list().returning(|_| {
            Ok(vec![UrlStats {
                url: record(1, "abc123", "https://example.com"),
                click_count: 4,
            }])
        });
        urls.expect_count()
            .withf(|search| search.as_deref() == Some("example"))
            .returning(|_| Ok(41));

        let filter = UrlFilter::new(2, 20).with_search(Some("example".to_string()));
        let page = service(urls, MockClickRepository::new())
            .list(filter)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_prev());
        assert!(page.has_next());
    }

    #[test]
    fn test_parse_expiration() {
        let now = Utc::now();

        assert_eq!(parse_expiration(None, now).unwrap(), None);
        assert_eq!(parse_expiration(Some("  "), now).unwrap(), None);
        assert_eq!(
            parse_expiration(Some(" 30 "), now).unwrap(),
            Some(now + Duration::days(30))
        );
        assert!(parse_expiration(Some("1.5"), now).is_err());
    }

    #[test]
    fn test_parse_expiration_upper_bound() {
        let now = Utc::now();

        assert_eq!(
            parse_expiration(Some("36500"), now).unwrap(),
            Some(now + Duration::days(MAX_EXPIRATION_DAYS))
        );
        assert!(matches!(
            parse_expiration(Some("36501"), now),
            Err(AppError::InvalidExpiration)
        ));
        assert!(matches!(
            parse_expiration(Some("3000000"), now),
            Err(AppError::InvalidExpiration)
        ));
    }

    #[test]
    fn test_empty_page_has_one_page() {
        let page: Page<()> = Page {
            items: vec![],
            page: 1,
            page_size: 20,
            total: 0,
        };

        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }
}
