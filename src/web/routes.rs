//! Page route configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::web::handlers::{
    analytics_handler, create_handler, delete_handler, index_handler, manage_handler,
    redirect_handler, toggle_handler, url_analytics_handler,
};

/// HTML pages and the redirect endpoint.
///
/// # Endpoints
///
/// - `GET /` - Creation form
/// - `POST /` - Create a short URL from the form
/// - `GET /analytics` - Service-wide analytics
/// - `GET /manage` - Paginated, searchable URL list
/// - `GET /url/{id}/analytics` - Analytics of one URL
/// - `POST /url/{id}/toggle` - Activate/deactivate
/// - `POST /url/{id}/delete` - Delete with all clicks
/// - `GET /{identifier}` - Redirect by short code or alias
///
/// Static paths take precedence over `/{identifier}`, so reserved words
/// never reach the redirect handler.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler).post(create_handler))
        .route("/analytics", get(analytics_handler))
        .route("/manage", get(manage_handler))
        .route("/url/{id}/analytics", get(url_analytics_handler))
        .route("/url/{id}/toggle", post(toggle_handler))
        .route("/url/{id}/delete", post(delete_handler))
        .route("/{identifier}", get(redirect_handler))
}
