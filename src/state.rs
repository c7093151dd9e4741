use std::fmt;
use std::sync::Arc;

use devcamper_config::{
    AppConfig, CorsConfig, Environment, GeocoderConfig, JwtConfig, RateLimitConfig, UploadConfig,
};
use devcamper_core::file_storage::{FileStorage, LocalFileStorage};
use devcamper_db::PgPool;

use crate::middleware::rate_limit::{KeyedRateLimiter, create_rate_limiter};
use crate::utils::geocoder::{Geocoder, geocoder_from_config};
use crate::utils::image::{ImageProcessor, ImageResizer};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub environment: Environment,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub upload_config: UploadConfig,
    pub rate_limiter: Arc<KeyedRateLimiter>,
    pub geocoder: Arc<dyn Geocoder>,
    pub image_processor: Arc<dyn ImageProcessor>,
    pub file_storage: Arc<dyn FileStorage>,
}

impl AppState {
    pub fn from_env(db: PgPool) -> Self {
        let rate_limit_config = RateLimitConfig::from_env();
        let upload_config = UploadConfig::from_env();

        Self {
            db,
            environment: AppConfig::from_env().environment,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            rate_limiter: create_rate_limiter(&rate_limit_config),
            rate_limit_config,
            file_storage: Arc::new(LocalFileStorage::new(&upload_config.path)),
            upload_config,
            geocoder: geocoder_from_config(&GeocoderConfig::from_env()),
            image_processor: Arc::new(ImageResizer::default()),
        }
    }

    /// Replaces the rate limit and rebuilds the limiter to match.
    pub fn with_rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limiter = create_rate_limiter(&config);
        self.rate_limit_config = config;
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.environment)
            .field("jwt_expire_secs", &self.jwt_config.expire_secs)
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .field("upload_config", &self.upload_config)
            .finish_non_exhaustive()
    }
}
