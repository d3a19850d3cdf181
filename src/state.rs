//! Shared application state injected into every handler.

use crate::application::services::{AnalyticsService, UrlService};
use std::sync::Arc;

/// Services and request-independent settings shared across handlers.
///
/// Built once at startup by [`crate::server::run`] (or by tests) and cloned
/// per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub analytics_service: Arc<AnalyticsService>,
    /// Key used to sign flash-message cookies.
    pub session_secret: Arc<str>,
    /// Public base for short URLs; derived from the request when absent.
    pub base_url: Option<Arc<str>>,
    /// Trust `X-Forwarded-*` headers for client IP and origin.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        url_service: Arc<UrlService>,
        analytics_service: Arc<AnalyticsService>,
        session_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            url_service,
            analytics_service,
            session_secret: session_secret.into(),
            base_url: None,
            behind_proxy: false,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.map(Into::into);
        self
    }

    pub fn with_behind_proxy(mut self, behind_proxy: bool) -> Self {
        self.behind_proxy = behind_proxy;
        self
    }
}
