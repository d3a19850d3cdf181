//! Request metadata extractors: client details for click recording and the
//! public origin used to build short URLs.

use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use std::convert::Infallible;
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Best-effort client metadata. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl FromRequestParts<AppState> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        let forwarded = state
            .behind_proxy
            .then(|| forwarded_for(&parts.headers))
            .flatten();

        Ok(Self {
            ip: forwarded.or(peer),
            user_agent: header_str(&parts.headers, header::USER_AGENT.as_str()),
            referer: header_str(&parts.headers, header::REFERER.as_str()),
        })
    }
}

/// Scheme and authority under which the service is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(pub String);

impl RequestOrigin {
    /// Builds the public short URL for `identifier`.
    pub fn short_url(&self, identifier: &str) -> String {
        format!("{}/{}", self.0.trim_end_matches('/'), identifier)
    }
}

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(base) = &state.base_url {
            return Ok(Self(base.to_string()));
        }

        let headers = &parts.headers;
        let (proxy_scheme, proxy_host) = if state.behind_proxy {
            (
                first_value(headers, X_FORWARDED_PROTO),
                first_value(headers, X_FORWARDED_HOST),
            )
        } else {
            (None, None)
        };

        let host = proxy_host
            .or_else(|| header_str(headers, header::HOST.as_str()))
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        let scheme = proxy_scheme
            .or_else(|| parts.uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        Ok(Self(format!("{scheme}://{host}")))
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_value(headers: &HeaderMap, name: &str) -> Option<String> {
    header_str(headers, name)
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
        .filter(|v| !v.is_empty())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    first_value(headers, X_FORWARDED_FOR)
}
