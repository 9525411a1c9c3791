//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NAVONA_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `NAVONA_HOST` - Bind address (default: 127.0.0.1)
//! - `NAVONA_PORT` - Listen port (default: 3000)
//! - `NAVONA_COUPON_CODE_LENGTH` - Random portion of coupon codes (default: 5)
//! - `NAVONA_COUPON_CODE_PREFIX` - Coupon code prefix (default: "SALE";
//!   set to an empty string to disable the prefix)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use navona_core::coupon::{DEFAULT_CODE_LENGTH, DEFAULT_CODE_PREFIX};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Coupon issuance knobs
    pub coupon: CouponSettings,
}

/// Knobs for coupon code generation.
#[derive(Debug, Clone)]
pub struct CouponSettings {
    /// Length of the random portion of generated codes.
    pub code_length: usize,
    /// Optional prefix (`SALE` yields `SALE-XXXXX`).
    pub code_prefix: Option<String>,
}

impl Default for CouponSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            code_prefix: Some(DEFAULT_CODE_PREFIX.to_owned()),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("NAVONA_DATABASE_URL")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("NAVONA_DATABASE_URL".to_owned()))?;

        let host = parse_or_default("NAVONA_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default("NAVONA_PORT", 3000)?;
        let code_length = parse_or_default("NAVONA_COUPON_CODE_LENGTH", DEFAULT_CODE_LENGTH)?;
        let code_prefix = parse_code_prefix(std::env::var("NAVONA_COUPON_CODE_PREFIX").ok());

        Ok(Self {
            database_url,
            host,
            port,
            coupon: CouponSettings {
                code_length,
                code_prefix,
            },
        })
    }

    /// The socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse an optional env var, falling back to a default when unset.
fn parse_or_default<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_owned(), raw)),
        Err(_) => Ok(default),
    }
}

/// Resolve the coupon code prefix: unset means the default, an explicitly
/// empty value disables the prefix entirely.
fn parse_code_prefix(raw: Option<String>) -> Option<String> {
    match raw {
        None => Some(DEFAULT_CODE_PREFIX.to_owned()),
        Some(value) if value.is_empty() => None,
        Some(value) => Some(value),
    }
}
