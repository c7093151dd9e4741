use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use devcamper_config::RateLimitConfig;
use devcamper_core::AppError;
use governor::{RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use tracing::warn;

use crate::state::AppState;

pub type KeyedRateLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later";

pub fn create_rate_limiter(config: &RateLimitConfig) -> Arc<KeyedRateLimiter> {
    Arc::new(RateLimiter::keyed(config.quota()))
}

/// Client address used as the limiter key. The socket peer, unless the
/// deployment trusts its proxy, in which case the first `x-forwarded-for`
/// hop wins.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    let forwarded = || {
        headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    trust_proxy
        .then(forwarded)
        .flatten()
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let key = client_key(req.headers(), peer, state.rate_limit_config.trust_proxy);

    if state.rate_limiter.check_key(&key).is_err() {
        warn!(client = %key, "Rate limit exceeded");
        return Err(AppError::too_many_requests(RATE_LIMIT_MESSAGE));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_key_ignores_forwarded_for_by_default() {
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));
        assert_eq!(client_key(&headers, Some(peer), false), "127.0.0.1");
    }

    #[test]
    fn test_client_key_uses_first_hop_behind_trusted_proxy() {
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_key(&headers, Some(peer), true), "203.0.113.7");
        assert_eq!(client_key(&HeaderMap::new(), Some(peer), true), "10.0.0.1");
    }

    #[test]
    fn test_client_key_without_peer() {
        assert_eq!(client_key(&HeaderMap::new(), None, false), "unknown");
    }

    #[test]
    fn test_limiter_enforces_burst_per_key() {
        let limiter = create_rate_limiter(&RateLimitConfig {
            max_requests: 2,
            window_secs: 600,
            trust_proxy: false,
        });
        let a = "10.0.0.1".to_string();
        let b = "10.0.0.2".to_string();

        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_err());
        assert!(limiter.check_key(&b).is_ok());
    }
}
