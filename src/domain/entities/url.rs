//! URL mapping entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Maximum stored length of a destination URL.
pub const MAX_LONG_URL_LEN: usize = 2048;

/// Maximum stored length of a description.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// A shortened URL mapping.
///
/// `short_code` is always set. When `custom_alias` is present it becomes the
/// public identifier, but the record still resolves through either value.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UrlRecord {
    pub id: i64,
    pub long_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub description: Option<String>,
}

impl UrlRecord {
    /// The identifier shown to users: the alias if one was chosen, otherwise the code.
    pub fn identifier(&self) -> &str {
        self.custom_alias.as_deref().unwrap_or(&self.short_code)
    }

    /// Returns true if the record expired before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the record may be followed at `now`.
    pub fn is_resolvable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }
}

/// Input data for inserting a new mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrl {
    pub long_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A mapping together with the number of clicks recorded for it.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UrlStats {
    #[sqlx(flatten)]
    pub url: UrlRecord,
    pub click_count: i64,
}
