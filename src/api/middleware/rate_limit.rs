//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Per-IP rate limiter layer.
pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Token bucket parameters for one limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Seconds between replenished requests.
    pub per_second: u64,
    pub burst: u32,
}

/// Creates a per-IP rate limiter.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Keys are the
/// socket peer address, so the server must be built with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// Returns `None` if either parameter is zero.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/auth/signin", post(sign_in_handler))
///     .layer(rate_limit::layer(RateLimit { per_second: 1, burst: 10 }).unwrap());
/// ```
pub fn layer(limit: RateLimit) -> Option<RateLimitLayer> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(limit.per_second)
        .burst_size(limit.burst)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}
