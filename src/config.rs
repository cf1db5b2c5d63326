//! Authentication Configuration
//!
//! All configuration values are loaded from environment variables and carried
//! in an explicit struct; nothing in the core reads the environment at
//! request time.

use crate::error::AuthError;
use std::env;

/// Authentication configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for signing access tokens (from ACCESS_TOKEN_SECRET env var)
    pub access_token_secret: String,

    /// Secret for signing refresh tokens (from REFRESH_TOKEN_SECRET env var)
    pub refresh_token_secret: String,

    /// Access token expiration in seconds (from ACCESS_TOKEN_EXPIRATION env var)
    pub access_token_expiration: i64,

    /// Refresh token expiration in seconds (from REFRESH_TOKEN_EXPIRATION env var)
    pub refresh_token_expiration: i64,

    /// JWT issuer claim (from JWT_ISSUER env var)
    pub jwt_issuer: String,

    /// Whether auth cookies are marked Secure (from COOKIE_SECURE env var)
    pub cookie_secure: bool,

    /// Upload endpoint of the media host (from MEDIA_UPLOAD_URL env var)
    pub media_upload_url: String,

    /// Deadline for media host calls in seconds (from MEDIA_UPLOAD_TIMEOUT env var)
    pub media_upload_timeout: u64,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl AuthConfig {
    /// Load configuration from environment variables
    ///
    /// # Panics
    /// Panics if ACCESS_TOKEN_SECRET or REFRESH_TOKEN_SECRET is not set
    pub fn from_env() -> Self {
        Self {
            access_token_secret: env::var("ACCESS_TOKEN_SECRET")
                .expect("ACCESS_TOKEN_SECRET environment variable must be set"),

            refresh_token_secret: env::var("REFRESH_TOKEN_SECRET")
                .expect("REFRESH_TOKEN_SECRET environment variable must be set"),

            access_token_expiration: env::var("ACCESS_TOKEN_EXPIRATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900), // 15 minutes default

            refresh_token_expiration: env::var("REFRESH_TOKEN_EXPIRATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(864000), // 10 days default

            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "cliphive".to_string()),

            cookie_secure: env::var("COOKIE_SECURE")
                .ok()
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),

            media_upload_url: env::var("MEDIA_UPLOAD_URL")
                .unwrap_or_else(|_| "http://localhost:9000/upload".to_string()),

            media_upload_timeout: env::var("MEDIA_UPLOAD_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            argon2_memory_cost: env::var("ARGON2_MEMORY_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(65536), // 64 MiB

            argon2_time_cost: env::var("ARGON2_TIME_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            argon2_parallelism: env::var("ARGON2_PARALLELISM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.access_token_secret.len() < 32 {
            return Err(AuthError::Config(
                "ACCESS_TOKEN_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.refresh_token_secret.len() < 32 {
            return Err(AuthError::Config(
                "REFRESH_TOKEN_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.access_token_secret == self.refresh_token_secret {
            return Err(AuthError::Config(
                "ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ".to_string(),
            ));
        }

        if self.access_token_expiration <= 0 {
            return Err(AuthError::Config(
                "ACCESS_TOKEN_EXPIRATION must be positive".to_string(),
            ));
        }

        if self.refresh_token_expiration <= self.access_token_expiration {
            return Err(AuthError::Config(
                "REFRESH_TOKEN_EXPIRATION must be greater than ACCESS_TOKEN_EXPIRATION".to_string(),
            ));
        }

        if self.media_upload_timeout == 0 {
            return Err(AuthError::Config(
                "MEDIA_UPLOAD_TIMEOUT must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
impl AuthConfig {
    /// Deterministic configuration for unit tests
    pub(crate) fn for_tests() -> Self {
        Self {
            access_token_secret: "a".repeat(32),
            refresh_token_secret: "r".repeat(32),
            access_token_expiration: 900,
            refresh_token_expiration: 864000,
            jwt_issuer: "cliphive-test".to_string(),
            cookie_secure: true,
            media_upload_url: "http://localhost:9000/upload".to_string(),
            media_upload_timeout: 5,
            // low-cost parameters so hashing stays fast in tests
            argon2_memory_cost: 8,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }
}
