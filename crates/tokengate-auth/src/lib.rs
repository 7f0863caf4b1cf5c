//! Bearer token issuance and verification
//!
//! The crate is split along the token lifecycle:
//!
//! - [`CredentialStore`] turns a username/password pair into an [`Identity`]
//! - [`TokenIssuer`] signs [`TokenClaims`] for that identity
//! - [`TokenVerifier`] turns a raw token back into claims, or classifies why it can't
//!
//! Both the issuer and the verifier are built from the same [`SigningKey`],
//! which is constructed once at startup and passed in explicitly.

pub mod credentials;
pub mod identity;
pub mod issuer;
pub mod jwt;
pub mod key;
pub mod verifier;

pub use credentials::{CredentialStore, StaticCredentialStore};
pub use identity::Identity;
pub use issuer::{TokenIssuer, DEFAULT_TOKEN_LIFETIME_SECS, MAX_TOKEN_LIFETIME_SECS};
pub use jwt::{SignedToken, TokenClaims, TokenError};
pub use key::{KeyError, SigningKey};
pub use verifier::{InvalidReason, TokenVerifier, VerificationOutcome};

