//! JWT (JSON Web Token) claims and encoding

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::Identity;
use crate::key::SigningKey;

/// The only algorithm tokens are signed and accepted with
pub(crate) const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims embedded in every issued token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject id
    pub sub: String,
    /// Display name
    pub username: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Fails with [`TokenError::InvalidLifetime`] when `issued_at + lifetime`
    /// is not a representable instant
    pub fn new(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let exp = issued_at
            .checked_add_signed(lifetime)
            .ok_or(TokenError::InvalidLifetime(lifetime.num_seconds()))?;

        Ok(Self {
            sub: identity.subject_id.clone(),
            username: identity.display_name.clone(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// Expired once `now` reaches `exp`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.sub.clone(), self.username.clone())
    }
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT encoding error: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Token lifetime out of range, got {0}s")]
    InvalidLifetime(i64),
}

/// A compact, signed JWT as handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedToken(String);

impl SignedToken {
    pub(crate) fn encode(key: &SigningKey, claims: &TokenClaims) -> Result<Self, TokenError> {
        let header = Header::new(ALGORITHM);
        Ok(Self(encode(&header, claims, &key.encoding_key())?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SignedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
