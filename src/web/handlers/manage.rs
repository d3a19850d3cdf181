//! Management dashboard: list, search, activate/deactivate, delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::domain::repositories::UrlFilter;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_meta::RequestOrigin;
use crate::web::flash::{Flash, IncomingFlash, redirect_with_flash};
use crate::web::forms::{MANAGE_PAGE_SIZE, ManageQuery};
use crate::web::handlers::analytics::parse_id;
use crate::web::handlers::errors::PageError;
use crate::web::views::UrlRow;

const MANAGE_PATH: &str = "/manage";

/// Template for the management page.
#[derive(Template, WebTemplate)]
#[template(path = "manage.html")]
pub struct ManageTemplate {
    pub flash: Option<Flash>,
    pub rows: Vec<UrlRow>,
    pub search: String,
    /// `&search=...` suffix for pagination links, empty without a search.
    pub search_query: String,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Lists short URLs newest-first, 20 per page, with optional search.
///
/// # Endpoint
///
/// `GET /manage?page=<n>&search=<term>`
///
/// The search matches URL, code, alias and description case-insensitively.
/// A missing or invalid page shows page 1.
pub async fn manage_handler(
    State(state): State<AppState>,
    Query(query): Query<ManageQuery>,
    origin: RequestOrigin,
    incoming: IncomingFlash,
) -> Result<Response, PageError> {
    let search = query.search();
    let filter = UrlFilter::new(query.page(), MANAGE_PAGE_SIZE).with_search(Some(search.clone()));
    let page = state.url_service.list(filter).await?;

    let search_query = if search.is_empty() {
        String::new()
    } else {
        let encoded: String = url::form_urlencoded::byte_serialize(search.as_bytes()).collect();
        format!("&search={encoded}")
    };

    let template = ManageTemplate {
        flash: incoming.flash.clone(),
        rows: page
            .items
            .iter()
            .map(|s| UrlRow::from_stats(s, &origin))
            .collect(),
        search,
        search_query,
        page: page.page,
        total_pages: page.total_pages(),
        total: page.total,
        has_prev: page.has_prev(),
        has_next: page.has_next(),
    };

    Ok(incoming.consume(template.into_response()))
}

/// Activates or deactivates a short URL.
///
/// # Endpoint
///
/// `POST /url/{id}/toggle`
///
/// Redirects to `/manage` with the outcome flashed; unknown ids render the
/// 404 page.
pub async fn toggle_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;

    let flash = match state.url_service.toggle(id).await {
        Ok(url) if url.is_active => Flash::success("URL activated successfully!"),
        Ok(_) => Flash::success("URL deactivated successfully!"),
        Err(AppError::NotFound) => return Err(AppError::NotFound.into()),
        Err(e) => {
            tracing::error!(id, error = %e, "Failed to toggle URL");
            Flash::error("Error updating URL status.")
        }
    };

    Ok(redirect_with_flash(&state.session_secret, MANAGE_PATH, flash))
}

/// Deletes a short URL and all of its clicks.
///
/// # Endpoint
///
/// `POST /url/{id}/delete`
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;

    let flash = match state.url_service.delete(id).await {
        Ok(_) => Flash::success("URL deleted successfully!"),
        Err(AppError::NotFound) => return Err(AppError::NotFound.into()),
        Err(e) => {
            tracing::error!(id, error = %e, "Failed to delete URL");
            Flash::error("Error deleting URL.")
        }
    };

    Ok(redirect_with_flash(&state.session_secret, MANAGE_PATH, flash))
}
