//! Token verification
//!
//! Verification never returns an error to the caller. Every failure is
//! folded into [`VerificationOutcome::Invalid`] with the first check that
//! failed, in this order:
//!
//! 1. structure: three base64url segments holding a JWT header and [`TokenClaims`]
//! 2. signature: HS256 over header and claims, compared in constant time
//! 3. expiry: `now` must be strictly before `exp`

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use tracing::debug;

use crate::jwt::{TokenClaims, ALGORITHM};
use crate::key::SigningKey;

/// Why a token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    MalformedCredential,
    BadSignature,
    Expired,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::MalformedCredential => "malformed-credential",
            InvalidReason::BadSignature => "bad-signature",
            InvalidReason::Expired => "expired",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of verifying a raw token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Valid(TokenClaims),
    Invalid(InvalidReason),
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid(_))
    }

    pub fn claims(&self) -> Option<&TokenClaims> {
        match self {
            VerificationOutcome::Valid(claims) => Some(claims),
            VerificationOutcome::Invalid(_) => None,
        }
    }
}

/// JWT verifier bound to a single signing key
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    structural: Validation,
}

impl TokenVerifier {
    /// Create a new verifier for HS256 tokens signed with `key`
    ///
    /// The library's own `exp` check is turned off: it applies a leeway,
    /// and expiry is decided here against an explicit instant instead.
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.validate_nbf = false;

        let mut structural = validation.clone();
        structural.insecure_disable_signature_validation();

        Self {
            decoding_key: key.decoding_key(),
            validation,
            structural,
        }
    }

    /// Verify `raw` against the current time
    pub fn verify(&self, raw: &str) -> VerificationOutcome {
        self.verify_at(raw, Utc::now())
    }

    /// Verify `raw` as if the current time were `now`
    pub fn verify_at(&self, raw: &str, now: DateTime<Utc>) -> VerificationOutcome {
        let outcome = match self.check(raw, now) {
            Ok(claims) => VerificationOutcome::Valid(claims),
            Err(reason) => VerificationOutcome::Invalid(reason),
        };

        if let VerificationOutcome::Invalid(reason) = &outcome {
            debug!(%reason, "Token rejected");
        }
        outcome
    }

    fn check(&self, raw: &str, now: DateTime<Utc>) -> Result<TokenClaims, InvalidReason> {
        // Structure only: signature validation is disabled for this pass
        decode::<TokenClaims>(raw, &self.decoding_key, &self.structural)
            .map_err(|_| InvalidReason::MalformedCredential)?;

        let claims = decode::<TokenClaims>(raw, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    InvalidReason::BadSignature
                }
                _ => InvalidReason::MalformedCredential,
            })?
            .claims;

        if claims.is_expired_at(now) {
            return Err(InvalidReason::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use crate::issuer::TokenIssuer;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const TEST_SECRET: &[u8] = b"test_secret_key_1234567890";
    const OTHER_SECRET: &[u8] = b"another_secret_key_0987654321";

    fn key(secret: &[u8]) -> SigningKey {
        SigningKey::new(secret).unwrap()
    }

    fn admin() -> Identity {
        Identity::new("1", "admin")
    }

    fn issue(now: DateTime<Utc>) -> String {
        TokenIssuer::new(key(TEST_SECRET))
            .issue_at(&admin(), now)
            .unwrap()
            .into_string()
    }

    #[test]
    fn test_issue_then_verify() {
        let now = Utc::now();
        let token = issue(now);

        let outcome = TokenVerifier::new(&key(TEST_SECRET)).verify_at(&token, now);

        let claims = outcome.claims().expect("token should be valid");
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.identity(), admin());
    }

    #[test]
    fn test_verify_uses_current_time() {
        let token = issue(Utc::now());
        assert!(TokenVerifier::new(&key(TEST_SECRET)).verify(&token).is_valid());
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let now = Utc::now();
        let token = issue(now);

        let outcome = TokenVerifier::new(&key(OTHER_SECRET)).verify_at(&token, now);

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(InvalidReason::BadSignature)
        );
    }

    #[test]
    fn test_expired_token() {
        let issued = Utc::now() - Duration::hours(2);
        let token = issue(issued);

        let outcome = TokenVerifier::new(&key(TEST_SECRET)).verify(&token);

        assert_eq!(outcome, VerificationOutcome::Invalid(InvalidReason::Expired));
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let issued = Utc::now();
        let token = issue(issued);
        let verifier = TokenVerifier::new(&key(TEST_SECRET));
        let exp = DateTime::<Utc>::from_timestamp(issued.timestamp() + 3600, 0).unwrap();

        assert!(verifier.verify_at(&token, exp - Duration::seconds(1)).is_valid());
        assert_eq!(
            verifier.verify_at(&token, exp),
            VerificationOutcome::Invalid(InvalidReason::Expired)
        );
    }

    #[test]
    fn test_expired_with_wrong_key_reports_bad_signature() {
        let token = issue(Utc::now() - Duration::hours(2));

        let outcome = TokenVerifier::new(&key(OTHER_SECRET)).verify(&token);

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(InvalidReason::BadSignature)
        );
    }

    #[test]
    fn test_malformed_inputs() {
        let verifier = TokenVerifier::new(&key(TEST_SECRET));

        for raw in [
            "",
            "abc",
            "a.b",
            "a.b.c",
            "not a token at all",
            "....",
            "eyJhbGciOiJIUzI1NiJ9.%%%.abc",
        ] {
            assert_eq!(
                verifier.verify(raw),
                VerificationOutcome::Invalid(InvalidReason::MalformedCredential),
                "input {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_claims_of_wrong_shape_are_malformed() {
        // Correctly signed, but the payload is not a claims object
        let token = encode(
            &Header::new(ALGORITHM),
            &serde_json::json!({ "sub": 1, "exp": "soon" }),
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        let outcome = TokenVerifier::new(&key(TEST_SECRET)).verify(&token);

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(InvalidReason::MalformedCredential)
        );
    }

    #[test]
    fn test_other_algorithm_is_bad_signature() {
        let now = Utc::now();
        let claims = TokenClaims::new(&admin(), now, Duration::hours(1)).unwrap();
        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        let outcome = TokenVerifier::new(&key(TEST_SECRET)).verify_at(&token, now);

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(InvalidReason::BadSignature)
        );
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        let now = Utc::now();
        let claims = TokenClaims::new(&admin(), now, Duration::hours(1)).unwrap();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let token = format!("{}.{}.", header, payload);

        let outcome = TokenVerifier::new(&key(TEST_SECRET)).verify_at(&token, now);

        assert!(!outcome.is_valid());
    }

    #[test]
    fn test_tampered_claims_are_bad_signature() {
        let now = Utc::now();
        let token = issue(now);
        let parts: Vec<&str> = token.split('.').collect();

        let mut claims: TokenClaims =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        claims.sub = "2".to_string();
        claims.exp += 3600;
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        let outcome = TokenVerifier::new(&key(TEST_SECRET)).verify_at(&forged, now);

        assert_eq!(
            outcome,
            VerificationOutcome::Invalid(InvalidReason::BadSignature)
        );
    }

    #[test]
    fn test_single_bit_flips_never_verify() {
        let now = Utc::now();
        let token = issue(now);
        let verifier = TokenVerifier::new(&key(TEST_SECRET));

        for index in 0..token.len() {
            for bit in 0..7 {
                let mut bytes = token.clone().into_bytes();
                bytes[index] ^= 1 << bit;
                let Ok(flipped) = String::from_utf8(bytes) else {
                    continue;
                };

                match verifier.verify_at(&flipped, now) {
                    VerificationOutcome::Invalid(InvalidReason::MalformedCredential)
                    | VerificationOutcome::Invalid(InvalidReason::BadSignature) => {}
                    other => panic!(
                        "flipping bit {} of byte {} produced {:?}",
                        bit, index, other
                    ),
                }
            }
        }
    }

    #[test]
    fn test_repeated_verification_is_stable() {
        let now = Utc::now();
        let token = issue(now);
        let verifier = TokenVerifier::new(&key(TEST_SECRET));

        let first = verifier.verify_at(&token, now);
        assert!(first.is_valid());
        for _ in 0..10 {
            assert_eq!(verifier.verify_at(&token, now), first);
        }
    }

    #[tokio::test]
    async fn test_concurrent_verification() {
        let now = Utc::now();
        let token = std::sync::Arc::new(issue(now));
        let verifier = std::sync::Arc::new(TokenVerifier::new(&key(TEST_SECRET)));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let token = token.clone();
                let verifier = verifier.clone();
                tokio::spawn(async move { verifier.verify_at(&token, now) })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_valid());
        }
    }
}
