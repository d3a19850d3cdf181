//! HTTP server initialization and runtime setup.
//!
//! Handles the database connection, service wiring and the Axum server lifecycle.

use crate::api::middleware::rate_limit::RateLimit;
use crate::application::services::{AnalyticsService, UrlService};
use crate::config::Config;
use crate::infrastructure::persistence;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Connection pool for the configured backend (PostgreSQL or SQLite)
/// - Embedded migrations
/// - URL and analytics services
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = persistence::connect(&config).await?;

    let url_service = Arc::new(UrlService::new(
        repositories.urls.clone(),
        repositories.clicks.clone(),
    ));
    let analytics_service = Arc::new(AnalyticsService::new(
        repositories.urls,
        repositories.clicks,
    ));

    let state = AppState::new(
        url_service,
        analytics_service,
        config.session_secret.as_str(),
    )
    .with_base_url(config.base_url.clone())
    .with_behind_proxy(config.behind_proxy);

    let app = app_router(state, RateLimit::for_proxy(config.behind_proxy));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
