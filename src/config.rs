//! Startup configuration
//!
//! Raw values come from flags or the environment; [`Settings::new`] checks
//! them once and yields the values the server is built from.

use std::net::{IpAddr, SocketAddr};

use chrono::Duration;
use thiserror::Error;
use tokengate_auth::{KeyError, SigningKey, MAX_TOKEN_LIFETIME_SECS};

/// Configuration faults; any of these aborts startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set; refusing to start without a signing secret")]
    MissingSecret,

    #[error("JWT_SECRET is unusable: {0}")]
    InvalidSecret(#[from] KeyError),

    #[error(
        "TOKEN_TTL_SECS must be between 1 and {max} seconds, got {0}",
        max = MAX_TOKEN_LIFETIME_SECS
    )]
    InvalidLifetime(i64),
}

/// Validated server settings
#[derive(Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub signing_key: SigningKey,
    pub token_lifetime: Duration,
}

impl Settings {
    pub fn new(
        jwt_secret: Option<String>,
        host: IpAddr,
        port: u16,
        token_ttl_secs: i64,
    ) -> Result<Self, ConfigError> {
        let secret = jwt_secret.ok_or(ConfigError::MissingSecret)?;
        let signing_key = SigningKey::new(secret.into_bytes())?;

        if !(1..=MAX_TOKEN_LIFETIME_SECS).contains(&token_ttl_secs) {
            return Err(ConfigError::InvalidLifetime(token_ttl_secs));
        }

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            signing_key,
            token_lifetime: Duration::seconds(token_ttl_secs),
        })
    }
}
