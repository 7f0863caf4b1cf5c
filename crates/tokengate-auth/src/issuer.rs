//! Token issuance

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::identity::Identity;
use crate::jwt::{SignedToken, TokenClaims, TokenError};
use crate::key::SigningKey;

/// Default token lifetime: one hour
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Longest accepted token lifetime: one year
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 3600;

/// Signs time-bounded tokens for already authenticated identities
///
/// Holds no per-token state; every call builds fresh claims from the
/// identity and the issuance instant.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: SigningKey,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer with the default one hour lifetime
    pub fn new(key: SigningKey) -> Self {
        Self {
            key,
            lifetime: Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS),
        }
    }

    /// Override the token lifetime; accepted range is one second up to
    /// [`MAX_TOKEN_LIFETIME_SECS`]
    pub fn with_lifetime(mut self, lifetime: Duration) -> Result<Self, TokenError> {
        if lifetime <= Duration::zero() || lifetime.num_seconds() > MAX_TOKEN_LIFETIME_SECS {
            return Err(TokenError::InvalidLifetime(lifetime.num_seconds()));
        }
        self.lifetime = lifetime;
        Ok(self)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `identity` valid from now
    pub fn issue(&self, identity: &Identity) -> Result<SignedToken, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token for `identity` as if issued at `now`
    pub fn issue_at(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let claims = TokenClaims::new(identity, now, self.lifetime)?;
        let token = SignedToken::encode(&self.key, &claims)?;

        debug!(sub = %claims.sub, exp = claims.exp, "Issued token");
        Ok(token)
    }
}
