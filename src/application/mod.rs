//! Application layer services implementing business logic.
//!
//! Services orchestrate repository calls, validation, and business rules, and
//! provide the API used by HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Creation, redirects, and management
//! - [`services::analytics_service::AnalyticsService`] - Click analytics

pub mod services;
