//! JSON API layer.
//!
//! Translates HTTP requests into service calls and formats responses
//! according to the API contracts. Errors are rendered as
//! `{"error": "...", "code": "..."}` by [`crate::error::AppError`].
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and tracing
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
