//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /health`          - Health check with database status
//! - `/api/*`                - JSON API (rate limited per client IP)
//! - `/`, `/manage`, ...     - HTML pages
//! - `GET  /{identifier}`    - Short URL redirect
//! - `/static/*`             - Static assets
//!
//! Anything else renders the 404 page.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::tracing;
use crate::state::AppState;
use crate::web;
use crate::web::handlers::not_found_handler;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - how `/api` is limited; [`RateLimit::PeerIp`] and
///   [`RateLimit::Proxied`] need the server to provide connect info
pub fn app_router(state: AppState, rate_limit: RateLimit) -> NormalizePath<Router> {
    let api_router = match rate_limit {
        RateLimit::Disabled => api::routes::routes(),
        RateLimit::PeerIp => api::routes::routes().layer(rate_limit::layer()),
        RateLimit::Proxied => api::routes::routes().layer(rate_limit::proxied_layer()),
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest_service("/static", ServeDir::new("static"))
        .merge(web::routes::routes())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
