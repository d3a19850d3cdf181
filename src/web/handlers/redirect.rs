//! Handler for short URL redirects.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::state::AppState;
use crate::utils::request_meta::ClientInfo;
use crate::web::handlers::errors::PageError;

/// Redirects a short code or alias to its destination.
///
/// # Endpoint
///
/// `GET /{identifier}`
///
/// # Request Flow
///
/// 1. Look up the identifier as short code or custom alias
/// 2. Refuse inactive and expired records
/// 3. Record the click (IP, user agent, referer); failures are only logged
/// 4. Return `301 Moved Permanently`
///
/// # Errors
///
/// Renders the 404 page for unknown identifiers and the home page with
/// status 410 for deactivated or expired ones.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    client: ClientInfo,
) -> Result<impl IntoResponse, PageError> {
    let long_url = state.url_service.follow(&identifier, &client).await?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, long_url)]))
}
