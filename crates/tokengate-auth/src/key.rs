//! Shared HMAC signing secret

use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};
use thiserror::Error;

/// Signing key errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("signing secret must not be empty")]
    Empty,
}

/// Process-wide HMAC-SHA256 secret shared by the issuer and the verifier
///
/// The secret bytes are never exposed through `Debug` or `Display`.
#[derive(Clone)]
pub struct SigningKey {
    secret: Vec<u8>,
}

impl SigningKey {
    /// Build a key from raw secret bytes
    ///
    /// Rejects empty and whitespace-only secrets; there is no fallback value.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let secret = secret.into();
        if secret.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(KeyError::Empty);
        }
        Ok(Self { secret })
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_secret() {
        assert_eq!(SigningKey::new("").unwrap_err(), KeyError::Empty);
        assert_eq!(SigningKey::new(" \t\n").unwrap_err(), KeyError::Empty);
    }

    #[test]
    fn test_accepts_non_empty_secret() {
        assert!(SigningKey::new("s3cret").is_ok());
        assert!(SigningKey::new(vec![0u8, 1, 2]).is_ok());
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let key = SigningKey::new("super-secret-value").unwrap();
        let rendered = format!("{:?}", key);

        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
