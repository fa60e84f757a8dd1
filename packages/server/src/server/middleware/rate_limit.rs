// Rate limiting middleware using tower-governor
//
// Configuration:
// - 10 requests per second per client IP, bursts up to 20
// - Client IP comes from X-Forwarded-For / X-Real-IP / Forwarded, then the
//   socket (SmartIpKeyExtractor), so the server must be served with connect info
// - x-ratelimit-* headers on every limited response (use_headers)
//
// Applied in app.rs to the /api routes when RATE_LIMIT_ENABLED is on

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};

pub const REQUESTS_PER_SECOND: u64 = 10;
pub const BURST_SIZE: u32 = 20;

/// Wrap `router` in the per-client-IP rate limiter.
pub fn with_rate_limit(router: Router) -> Result<Router> {
    let config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(REQUESTS_PER_SECOND)
            .burst_size(BURST_SIZE)
            .use_headers()
            .finish()
            .context("Invalid rate limiter configuration")?,
    );

    Ok(router.layer(GovernorLayer { config }))
}
