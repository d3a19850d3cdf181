//! HTML page handlers.

mod analytics;
mod errors;
mod home;
mod manage;
mod redirect;

pub use analytics::{analytics_handler, url_analytics_handler};
pub use errors::{PageError, not_found_handler};
pub use home::{create_handler, index_handler};
pub use manage::{delete_handler, manage_handler, toggle_handler};
pub use redirect::redirect_handler;
