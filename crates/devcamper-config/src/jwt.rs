use std::env;

use crate::env_or;

const THIRTY_DAYS_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub expire_secs: i64,
    /// Auth cookie lifetime in days.
    pub cookie_expire_days: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            expire_secs: env_or("JWT_EXPIRE", THIRTY_DAYS_SECS),
            cookie_expire_days: env_or("JWT_COOKIE_EXPIRE", 30),
        }
    }

    pub fn cookie_max_age_secs(&self) -> i64 {
        self.cookie_expire_days * 24 * 60 * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_max_age() {
        let config = JwtConfig {
            secret: "s".to_string(),
            expire_secs: 60,
            cookie_expire_days: 2,
        };
        assert_eq!(config.cookie_max_age_secs(), 172_800);
    }
}
