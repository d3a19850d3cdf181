//! Home page: the creation form and its result.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::state::AppState;
use crate::utils::request_meta::RequestOrigin;
use crate::web::flash::{Flash, IncomingFlash, redirect_with_flash};
use crate::web::forms::CreateUrlForm;
use crate::web::views::CreatedView;

/// Template for the home page.
///
/// Renders `templates/index.html` with the creation form, an optional flash
/// message, and the short URL after a successful submission.
#[derive(Template, WebTemplate, Default)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub flash: Option<Flash>,
    pub created: Option<CreatedView>,
}

impl IndexTemplate {
    pub fn with_flash(flash: Flash) -> Self {
        Self {
            flash: Some(flash),
            created: None,
        }
    }
}

/// Renders the creation form.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler(incoming: IncomingFlash) -> Response {
    let page = IndexTemplate {
        flash: incoming.flash.clone(),
        created: None,
    };
    incoming.consume(page.into_response())
}

/// Handles the creation form.
///
/// # Endpoint
///
/// `POST /` (form fields `long_url`, `custom_alias`, `description`, `expires_in`)
///
/// # Response
///
/// - Success or existing URL: the home page with the short URL
/// - Any error: `303 See Other` back to `/` with the error flashed
pub async fn create_handler(
    State(state): State<AppState>,
    origin: RequestOrigin,
    Form(form): Form<CreateUrlForm>,
) -> Response {
    match state.url_service.create_short_url(form.into()).await {
        Ok(outcome) => {
            let flash = if outcome.existing {
                Flash::info("This URL has already been shortened!")
            } else {
                Flash::success("URL shortened successfully!")
            };

            IndexTemplate {
                flash: Some(flash),
                created: Some(CreatedView::new(&outcome, &origin)),
            }
            .into_response()
        }
        Err(e) => {
            let message = if e.is_internal() {
                tracing::error!(error = %e, "Failed to shorten URL");
                "An error occurred while shortening the URL. Please try again.".to_string()
            } else {
                e.public_message()
            };

            redirect_with_flash(&state.session_secret, "/", Flash::error(message))
        }
    }
}
