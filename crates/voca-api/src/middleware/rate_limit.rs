//! Per-IP rate limiting with `tower_governor`.
//!
//! Client IPs come from `X-Forwarded-For`/`X-Real-IP` when present, falling
//! back to the peer address, so the server must be started with
//! `into_make_service_with_connect_info::<SocketAddr>()`.

/// Milliseconds between replenished requests on ordinary API routes (10/s)
pub const GENERAL_REPLENISH_MS: u64 = 100;
pub const GENERAL_BURST_SIZE: u32 = 30;

/// Milliseconds between replenished requests on routes that call the model
pub const AI_REPLENISH_MS: u64 = 2000;
pub const AI_BURST_SIZE: u32 = 5;

/// Build a `GovernorLayer` keyed by client IP.
///
/// The configuration is built from constants, so a failure here is a
/// programming error.
#[macro_export]
macro_rules! make_rate_limit_layer {
    ($replenish_ms:expr, $burst:expr) => {{
        let config = ::tower_governor::governor::GovernorConfigBuilder::default()
            .per_millisecond($replenish_ms)
            .burst_size($burst)
            .key_extractor(::tower_governor::key_extractor::SmartIpKeyExtractor)
            .use_headers()
            .finish()
            .expect("invalid rate limiter configuration");

        ::tower_governor::GovernorLayer::new(config)
    }};
}
