//! Core domain entities.
//!
//! - [`UrlRecord`] - A short identifier mapped to a destination URL
//! - [`UrlStats`] - A record together with its click count
//! - [`Click`] - A recorded visit through a short identifier
//! - [`DailyCount`] - Clicks grouped by UTC day
//!
//! Insert-side structs (`NewUrl`, `NewClick`) carry only what the caller
//! supplies; identities are assigned by the database.

pub mod click;
pub mod url;

pub use click::{Click, DailyCount, NewClick};
pub use url::{NewUrl, UrlRecord, UrlStats};
