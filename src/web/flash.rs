//! One-shot flash messages carried in a signed cookie.
//!
//! A page action (create, toggle, delete) sets the cookie and redirects; the
//! next page render reads it, shows the message and clears the cookie.
//!
//! # Cookie Format
//!
//! ```text
//! flash=<base64url(json)>.<hex(hmac-sha256(base64url(json)))>
//! ```
//!
//! Cookies with a missing or wrong signature are ignored.

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, LOCATION, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::convert::Infallible;

use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

const COOKIE_NAME: &str = "flash";
const CLEAR_COOKIE: &str = "flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0";

/// Message severity, used as the CSS modifier when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// Encodes and signs this message as a cookie value.
    ///
    /// Returns `None` (and logs) if the message cannot be serialized.
    pub fn encode(&self, secret: &str) -> Option<String> {
        let json = serde_json::to_vec(self)
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to serialize flash message"))
            .ok()?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = hex::encode(mac(secret, &payload).finalize().into_bytes());
        Some(format!("{payload}.{signature}"))
    }

    /// Verifies and decodes a cookie value produced by [`Flash::encode`].
    pub fn decode(value: &str, secret: &str) -> Option<Self> {
        let (payload, signature) = value.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;
        mac(secret, payload).verify_slice(&signature).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// `Set-Cookie` value that stores this message.
    pub fn set_cookie(&self, secret: &str) -> Option<String> {
        self.encode(secret)
            .map(|value| format!("{COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax"))
    }
}

fn mac(secret: &str, payload: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    mac
}

fn cookie_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == COOKIE_NAME).then_some(value)
        })
}

/// Flash message received with the request, if any.
///
/// `present` is true when a flash cookie was sent at all (even an invalid
/// one), so the response knows to clear it.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash {
    pub flash: Option<Flash>,
    present: bool,
}

impl IncomingFlash {
    /// Attaches a cookie-clearing header to `response` when needed.
    pub fn consume(&self, mut response: Response) -> Response {
        if self.present {
            response
                .headers_mut()
                .append(SET_COOKIE, HeaderValue::from_static(CLEAR_COOKIE));
        }
        response
    }
}

impl FromRequestParts<AppState> for IncomingFlash {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = cookie_value(&parts.headers) else {
            return Ok(Self::default());
        };

        let flash = Flash::decode(raw, &state.session_secret);
        if flash.is_none() {
            tracing::debug!("Ignoring flash cookie with invalid signature");
        }

        Ok(Self {
            flash,
            present: true,
        })
    }
}

/// Redirects with `303 See Other` after storing `flash`.
///
/// A target that is not a valid header value redirects to `/`. The redirect
/// still happens if the message cannot be stored.
pub fn redirect_with_flash(secret: &str, to: &str, flash: Flash) -> Response {
    let mut response = StatusCode::SEE_OTHER.into_response();
    let headers = response.headers_mut();

    let location = HeaderValue::from_str(to).unwrap_or(HeaderValue::from_static("/"));
    headers.insert(LOCATION, location);

    match flash
        .set_cookie(secret)
        .map(|cookie| HeaderValue::from_str(&cookie))
    {
        Some(Ok(cookie)) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Some(Err(e)) => tracing::warn!(error = %e, "Flash cookie is not a valid header value"),
        None => {}
    }

    response
}
