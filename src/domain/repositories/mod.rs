//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations for
//! PostgreSQL and SQLite live in `crate::infrastructure::persistence`.
//! Mock implementations are generated via `mockall` for service tests.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Mapping store (records, lookup, search, management)
//! - [`ClickRepository`] - Click recording and analytics queries

pub mod click_repository;
pub mod url_repository;

pub use click_repository::ClickRepository;
pub use url_repository::{UrlFilter, UrlRepository};

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
