//! Browser-facing pages rendered with Askama.
//!
//! # Modules
//!
//! - [`handlers`] - Page handlers and the HTML error type
//! - [`flash`] - Signed one-shot flash messages
//! - [`forms`] - Form bodies and query parameters
//! - [`views`] - Display rows handed to templates
//! - [`routes`] - Page route configuration

pub mod flash;
pub mod forms;
pub mod handlers;
pub mod routes;
pub mod views;

pub use handlers::PageError;
