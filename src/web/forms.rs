//! Form bodies and query parameters of the HTML pages.

use serde::Deserialize;
use serde_with::{DefaultOnError, DisplayFromStr, serde_as};

use crate::application::services::CreateUrl;

/// Rows per page on the management dashboard.
pub const MANAGE_PAGE_SIZE: i64 = 20;

/// Body of the creation form on `/`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUrlForm {
    #[serde(default)]
    pub long_url: String,
    #[serde(default)]
    pub custom_alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expires_in: String,
}

impl From<CreateUrlForm> for CreateUrl {
    fn from(form: CreateUrlForm) -> Self {
        CreateUrl {
            long_url: form.long_url,
            alias: Some(form.custom_alias),
            description: Some(form.description),
            expires_in: Some(form.expires_in),
        }
    }
}

/// Query parameters of `/manage`.
///
/// An unparsable `page` is treated as absent rather than rejected.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ManageQuery {
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde(default)]
    pub search: Option<String>,
}

impl ManageQuery {
    /// Requested page, falling back to 1 for missing or non-positive values.
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }

    /// Trimmed search term, or an empty string.
    pub fn search(&self) -> String {
        self.search
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }
}
