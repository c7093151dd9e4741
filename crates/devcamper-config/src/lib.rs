//! # DevCamper Config
//!
//! Typed configuration loaded from environment variables. Every struct has a
//! `from_env()` constructor that falls back to development defaults.
//!
//! - [`app`]: server port and runtime environment
//! - [`jwt`]: token signing and cookie lifetime
//! - [`cors`]: allowed origins
//! - [`rate_limit`]: request ceiling per client
//! - [`upload`]: photo upload destination and size cap
//! - [`geocoder`]: geocoding provider selection
//!
//! ```ignore
//! use devcamper_config::{AppConfig, JwtConfig, RateLimitConfig};
//!
//! let app = AppConfig::from_env();
//! let jwt = JwtConfig::from_env();
//! let quota = RateLimitConfig::from_env().quota();
//! ```

pub mod app;
pub mod cors;
pub mod geocoder;
pub mod jwt;
pub mod rate_limit;
pub mod upload;

pub use app::{AppConfig, Environment};
pub use cors::CorsConfig;
pub use geocoder::{GeocoderConfig, GeocoderProvider};
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use upload::UploadConfig;

pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
