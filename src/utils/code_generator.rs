//! Short code generation.
//!
//! Codes are drawn uniformly from the 62-character alphanumeric alphabet.
//! Uniqueness against stored identifiers is enforced by the caller
//! (see [`crate::application::services::UrlService`]).

use rand::{Rng, distr::Alphanumeric};

/// Length of generated short codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generates a random alphanumeric code of `length` characters.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(DEFAULT_CODE_LENGTH);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
