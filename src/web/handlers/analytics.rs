//! Analytics pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_meta::RequestOrigin;
use crate::web::flash::{Flash, IncomingFlash};
use crate::web::handlers::errors::PageError;
use crate::web::views::{ClickRow, DayBar, UrlRow, day_bars};

/// Template for the service-wide analytics dashboard.
#[derive(Template, WebTemplate)]
#[template(path = "analytics.html")]
pub struct AnalyticsTemplate {
    pub flash: Option<Flash>,
    pub total_urls: i64,
    pub total_clicks: i64,
    pub active_urls: i64,
    pub recent: Vec<UrlRow>,
    pub popular: Vec<UrlRow>,
    pub daily: Vec<DayBar>,
}

/// Template for the analytics of one short URL.
#[derive(Template, WebTemplate)]
#[template(path = "url_analytics.html")]
pub struct UrlAnalyticsTemplate {
    pub flash: Option<Flash>,
    pub url: UrlRow,
    pub total_clicks: i64,
    pub clicks: Vec<ClickRow>,
    pub daily: Vec<DayBar>,
}

/// Renders totals, the newest and most-clicked URLs, and clicks per day for
/// the last week.
///
/// # Endpoint
///
/// `GET /analytics`
pub async fn analytics_handler(
    State(state): State<AppState>,
    origin: RequestOrigin,
    incoming: IncomingFlash,
) -> Result<Response, PageError> {
    let summary = state.analytics_service.summary().await?;

    let page = AnalyticsTemplate {
        flash: incoming.flash.clone(),
        total_urls: summary.total_urls,
        total_clicks: summary.total_clicks,
        active_urls: summary.active_urls,
        recent: summary
            .recent
            .iter()
            .map(|s| UrlRow::from_stats(s, &origin))
            .collect(),
        popular: summary
            .popular
            .iter()
            .map(|s| UrlRow::from_stats(s, &origin))
            .collect(),
        daily: day_bars(&summary.daily),
    };

    Ok(incoming.consume(page.into_response()))
}

/// Renders the latest clicks and clicks per day for the last 30 days of one URL.
///
/// # Endpoint
///
/// `GET /url/{id}/analytics`
///
/// # Errors
///
/// Renders the 404 page for unknown or non-numeric ids.
pub async fn url_analytics_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    origin: RequestOrigin,
    incoming: IncomingFlash,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;
    let detail = state.analytics_service.url_detail(id).await?;

    let page = UrlAnalyticsTemplate {
        flash: incoming.flash.clone(),
        url: UrlRow::new(&detail.url, detail.total_clicks, &origin),
        total_clicks: detail.total_clicks,
        clicks: detail.recent_clicks.iter().map(ClickRow::from).collect(),
        daily: day_bars(&detail.daily),
    };

    Ok(incoming.consume(page.into_response()))
}

/// Parses a record id from a path segment; anything non-numeric is unknown.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}
