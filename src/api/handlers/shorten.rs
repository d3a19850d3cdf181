//! Handler for the shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_meta::RequestOrigin;

/// Creates a short URL, or returns the existing one for the same destination.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "alias": "my-link",          // optional
///   "description": "Landing",     // optional
///   "expires_in": 7               // optional, days
/// }
/// ```
///
/// # Response
///
/// `201 Created` for a new record, `200 OK` when an active record for the
/// same URL already existed:
///
/// ```json
/// {
///   "short_url": "https://sho.rt/my-link",
///   "long_url": "https://example.com/some/long/path",
///   "created_at": "2025-01-01T12:00:00Z",
///   "expires_at": "2025-01-08T12:00:00Z",
///   "existing": false
/// }
/// ```
///
/// # Errors
///
/// - `400` for malformed JSON and validation or business-rule failures
/// - `409` when a generated short code lost a uniqueness race
/// - `500` on storage failures
pub async fn shorten_handler(
    State(state): State<AppState>,
    origin: RequestOrigin,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let outcome = state.url_service.create_short_url(payload.into()).await?;

    let status = if outcome.existing {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let short_url = origin.short_url(outcome.record.identifier());

    Ok((status, Json(ShortenResponse::new(outcome, short_url))))
}
