//! Request ceiling per client.
//!
//! - `RATE_LIMIT_MAX_REQUESTS`: requests allowed per window (default 100)
//! - `RATE_LIMIT_WINDOW_SECS`: window length in seconds (default 600)
//! - `RATE_LIMIT_TRUST_PROXY`: key clients on the first `x-forwarded-for`
//!   hop instead of the socket peer (default false). Only enable behind a
//!   proxy that overwrites the header.
//!
//! The window is enforced as a token bucket: a client may spend the whole
//! allowance at once and regains one request every `window / max_requests`.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::Quota;

use crate::env_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_secs: 600,
            trust_proxy: false,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: env_or("RATE_LIMIT_MAX_REQUESTS", defaults.max_requests),
            window_secs: env_or("RATE_LIMIT_WINDOW_SECS", defaults.window_secs),
            trust_proxy: env_or("RATE_LIMIT_TRUST_PROXY", defaults.trust_proxy),
        }
    }

    /// Governor quota for this config. Zero values are raised to one.
    #[must_use]
    pub fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.max_requests).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(self.window_secs.max(1));
        let period = window / burst.get();

        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}
