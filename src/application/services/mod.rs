//! Business logic services for the application layer.

pub mod analytics_service;
pub mod url_service;

pub use analytics_service::{AnalyticsService, AnalyticsSummary, DailyCount, UrlDetail};
pub use url_service::{CreateOutcome, CreateUrl, Page, UrlService};
