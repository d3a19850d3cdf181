//! DTOs for the shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CreateOutcome, CreateUrl};

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The destination URL. A missing scheme defaults to `https://`.
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub url: String,

    /// Optional custom alias used instead of the generated code.
    #[serde(default, alias = "custom_alias")]
    pub alias: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub description: Option<String>,

    /// Lifetime in days, as a JSON number or a numeric string.
    #[serde(default)]
    pub expires_in: Option<ExpiresIn>,
}

/// Expiration period accepted either as `7` or `"7"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExpiresIn {
    Days(i64),
    Text(String),
}

impl ExpiresIn {
    fn into_raw(self) -> String {
        match self {
            ExpiresIn::Days(days) => days.to_string(),
            ExpiresIn::Text(text) => text,
        }
    }
}

impl From<ShortenRequest> for CreateUrl {
    fn from(req: ShortenRequest) -> Self {
        CreateUrl {
            long_url: req.url,
            alias: req.alias,
            description: req.description,
            expires_in: req.expires_in.map(ExpiresIn::into_raw),
        }
    }
}

/// Response for a created (201) or already existing (200) short URL.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub existing: bool,
}

impl ShortenResponse {
    pub fn new(outcome: CreateOutcome, short_url: String) -> Self {
        let CreateOutcome { record, existing } = outcome;
        Self {
            short_url,
            long_url: record.long_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
            existing,
        }
    }
}
