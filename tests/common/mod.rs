#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use chrono::{DateTime, Duration, Utc};
use clipurl::api::middleware::rate_limit::RateLimit;
use clipurl::application::services::{AnalyticsService, UrlService};
use clipurl::domain::entities::{NewClick, NewUrl, UrlRecord};
use clipurl::infrastructure::persistence::Repositories;
use clipurl::routes::app_router;
use clipurl::state::AppState;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const TEST_SECRET: &str = "test-session-secret";

pub fn create_test_state(pool: SqlitePool) -> AppState {
    let repositories = Repositories::sqlite(pool);

    let url_service = Arc::new(UrlService::new(
        repositories.urls.clone(),
        repositories.clicks.clone(),
    ));
    let analytics_service = Arc::new(AnalyticsService::new(
        repositories.urls,
        repositories.clicks,
    ));

    AppState::new(url_service, analytics_service, TEST_SECRET)
}

/// Full application router without rate limiting.
pub fn create_test_app(pool: SqlitePool) -> axum::Router {
    let app = app_router(create_test_state(pool), RateLimit::Disabled);
    Router::new().fallback_service(MockConnectInfoLayer.layer(app))
}

pub async fn insert_url(
    pool: &SqlitePool,
    short_code: &str,
    custom_alias: Option<&str>,
    long_url: &str,
) -> UrlRecord {
    insert_url_with(pool, short_code, custom_alias, long_url, None, true).await
}

pub async fn insert_url_with(
    pool: &SqlitePool,
    short_code: &str,
    custom_alias: Option<&str>,
    long_url: &str,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
) -> UrlRecord {
    let repositories = Repositories::sqlite(pool.clone());

    let mut url = repositories
        .urls
        .create(NewUrl {
            long_url: long_url.to_string(),
            short_code: short_code.to_string(),
            custom_alias: custom_alias.map(str::to_string),
            description: None,
            created_at: Utc::now(),
            expires_at,
        })
        .await
        .unwrap();

    if !is_active {
        url.is_active = false;
        url = repositories.urls.update(&url).await.unwrap();
    }

    url
}

pub async fn insert_expired_url(pool: &SqlitePool, short_code: &str, long_url: &str) -> UrlRecord {
    let past = Utc::now() - Duration::hours(1);
    insert_url_with(pool, short_code, None, long_url, Some(past), true).await
}

pub async fn insert_click(pool: &SqlitePool, url_id: i64, ip: &str) {
    Repositories::sqlite(pool.clone())
        .clicks
        .record_click(NewClick::new(url_id, Some(ip), None, None))
        .await
        .unwrap();
}

pub async fn click_count(pool: &SqlitePool, url_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM url_clicks WHERE url_id = ?1")
        .bind(url_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn url_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn short_codes(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar("SELECT short_code FROM urls ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
