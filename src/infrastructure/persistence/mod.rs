//! Repository implementations for PostgreSQL and SQLite.
//!
//! Both backends implement the domain repository traits with SQLx runtime
//! queries; [`database::connect`] picks one from the configured URL.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] / [`SqliteUrlRepository`] - URL mapping storage
//! - [`PgClickRepository`] / [`SqliteClickRepository`] - Click events

pub mod database;
pub mod pg_click_repository;
pub mod pg_url_repository;
pub mod sqlite_click_repository;
pub mod sqlite_url_repository;

pub use database::{Repositories, connect};
pub use pg_click_repository::PgClickRepository;
pub use pg_url_repository::PgUrlRepository;
pub use sqlite_click_repository::SqliteClickRepository;
pub use sqlite_url_repository::SqliteUrlRepository;
