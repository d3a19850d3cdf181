//! Handler for per-URL statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns metadata and the click count of a short URL.
///
/// # Endpoint
///
/// `GET /api/stats/{identifier}`
///
/// The identifier may be either the generated short code or the custom alias.
/// Inactive and expired records are still reported.
///
/// # Errors
///
/// Returns 404 Not Found if no record matches.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.url_service.stats(&identifier).await?;
    Ok(Json(stats.into()))
}
