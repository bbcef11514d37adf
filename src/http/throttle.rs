//! Client-side request throttling
//!
//! A direct (unkeyed) governor token bucket shared by every request the
//! client sends.

use crate::error::{Error, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per second
    pub requests_per_second: u32,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Token bucket shared across clones
#[derive(Clone)]
pub struct Throttle {
    bucket: Arc<DefaultDirectRateLimiter>,
}

impl Throttle {
    /// Build a throttle; both rate and burst must be non-zero
    pub fn new(config: &RateLimiterConfig) -> Result<Self> {
        let rate = NonZeroU32::new(config.requests_per_second)
            .ok_or_else(|| Error::config("rate_limit.requests_per_second must be > 0"))?;
        let burst = NonZeroU32::new(config.burst_size)
            .ok_or_else(|| Error::config("rate_limit.burst_size must be > 0"))?;

        Ok(Self {
            bucket: Arc::new(RateLimiter::direct(
                Quota::per_second(rate).allow_burst(burst),
            )),
        })
    }

    /// Wait for a token
    pub async fn wait(&self) {
        self.bucket.until_ready().await;
    }

    /// Take a token if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle").finish_non_exhaustive()
    }
}
