//! HTML error pages and the page-flow error type.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::web::flash::Flash;
use crate::web::handlers::home::IndexTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {}

#[derive(Template, WebTemplate)]
#[template(path = "500.html")]
pub struct ServerErrorTemplate {}

/// Error returned by page handlers; renders HTML instead of JSON.
///
/// - [`AppError::NotFound`] renders the 404 page
/// - [`AppError::Deactivated`] / [`AppError::Expired`] render the home page
///   with the reason, status `410 Gone`
/// - other client errors render the home page with the message
/// - server errors are logged and render the 500 page
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(e: AppError) -> Self {
        PageError(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let err = self.0;

        match err {
            AppError::NotFound => not_found(),
            _ if err.is_internal() => {
                tracing::error!(error = %err, code = err.code(), "Page request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ServerErrorTemplate {}).into_response()
            }
            _ => (
                err.status(),
                IndexTemplate::with_flash(Flash::error(err.public_message())),
            )
                .into_response(),
        }
    }
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate {}).into_response()
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> Response {
    not_found()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_per_error() {
        assert_eq!(
            PageError(AppError::NotFound).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PageError(AppError::Expired).into_response().status(),
            StatusCode::GONE
        );
        assert_eq!(
            PageError(AppError::AllocationExhausted)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
