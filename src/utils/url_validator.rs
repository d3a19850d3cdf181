//! Validation of submitted destination URLs and custom aliases.

use crate::error::AppError;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Schemes that are never accepted, matched case-insensitively anywhere in the input.
const DISALLOWED_SCHEMES: &[&str] = &["javascript:", "data:", "file:", "ftp:"];

/// Route segments a custom alias may not take.
pub const RESERVED_ALIASES: &[&str] = &["analytics", "manage", "api", "url", "static", "health"];

const ALIAS_MIN_LEN: usize = 3;
const ALIAS_MAX_LEN: usize = 50;

static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("alias regex is valid"));

/// Validates a submitted destination URL and returns its absolute form.
///
/// # Rules
///
/// 1. Surrounding whitespace is ignored; an empty input is rejected
/// 2. `javascript:`, `data:`, `file:` and `ftp:` are rejected wherever they appear
/// 3. Input without an `http://` or `https://` prefix gets `https://` prepended
/// 4. Control characters (tabs, newlines and the like) are rejected
/// 5. The result must parse and carry a non-empty host
///
/// The returned string is the (possibly prefixed) input, not a re-serialized
/// form, so deduplication compares what the user submitted.
///
/// # Errors
///
/// Returns [`AppError::EmptyInput`], [`AppError::DisallowedScheme`] or
/// [`AppError::MalformedUrl`].
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_url("example.com").unwrap(), "https://example.com");
/// assert!(validate_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyInput);
    }

    if trimmed.chars().any(char::is_control) {
        return Err(AppError::MalformedUrl);
    }

    let lowered = trimmed.to_ascii_lowercase();
    if DISALLOWED_SCHEMES.iter().any(|scheme| lowered.contains(scheme)) {
        return Err(AppError::DisallowedScheme);
    }

    let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|_| AppError::MalformedUrl)?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(candidate),
        _ => Err(AppError::MalformedUrl),
    }
}

/// Returns true if `alias` is an acceptable custom alias.
///
/// An empty alias is valid because the alias is optional. Otherwise it must be
/// 3-50 characters of letters, digits, hyphens and underscores.
pub fn validate_alias(alias: &str) -> bool {
    if alias.is_empty() {
        return true;
    }

    let len = alias.chars().count();
    (ALIAS_MIN_LEN..=ALIAS_MAX_LEN).contains(&len) && ALIAS_RE.is_match(alias)
}

/// Returns true if `alias` would shadow a page route.
pub fn is_reserved_alias(alias: &str) -> bool {
    RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
}
