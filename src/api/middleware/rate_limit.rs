//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Sustained requests per second allowed per client.
const PER_SECOND: u64 = 2;

/// Requests a client may burst above the sustained rate.
const BURST_SIZE: u32 = 30;

/// How the API router is rate limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimit {
    /// No limiting (tests and embedding applications).
    Disabled,
    /// Keyed by the socket peer address.
    PeerIp,
    /// Keyed by `X-Forwarded-For` / `X-Real-IP`, falling back to the peer.
    /// Use only behind a trusted reverse proxy.
    Proxied,
}

impl RateLimit {
    /// Picks the mode for a server that may sit behind a proxy.
    pub fn for_proxy(behind_proxy: bool) -> Self {
        if behind_proxy {
            RateLimit::Proxied
        } else {
            RateLimit::PeerIp
        }
    }
}

/// Creates a per-IP rate limiter keyed by the socket peer address.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 30 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
/// The server must be started with connect info so the peer is known.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(PER_SECOND)
        .burst_size(BURST_SIZE)
        .finish()
        .expect("rate limit quota is non-zero");

    GovernorLayer::new(Arc::new(governor_conf))
}

/// Same limits as [`layer`], keyed by the client address reported by a
/// reverse proxy.
pub fn proxied_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(PER_SECOND)
        .burst_size(BURST_SIZE)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .expect("rate limit quota is non-zero");

    GovernorLayer::new(Arc::new(governor_conf))
}
