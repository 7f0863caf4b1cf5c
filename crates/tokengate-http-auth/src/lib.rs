//! Access guard for bearer-token protected HTTP routes
//!
//! The guard is framework agnostic: it inspects an [`http::HeaderMap`],
//! verifies the bearer token and answers with a [`GuardDecision`]. Web
//! framework glue (middleware, extractors) turns that decision into a
//! response or a request extension.
//!
//! # Usage
//!
//! ```ignore
//! use tokengate_http_auth::{AccessGuard, GuardDecision};
//!
//! let guard = AccessGuard::new(verifier);
//!
//! match guard.check(request.headers()) {
//!     GuardDecision::Admit(admission) => { /* run the handler with admission.identity */ }
//!     GuardDecision::Reject { status, kind } => { /* respond with status and kind.to_string() */ }
//! }
//! ```
//!
//! Every verification failure is reported as [`RejectKind::InvalidOrExpired`];
//! callers never learn which check failed.

mod bearer;

pub use bearer::extract_bearer_token;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use http::{HeaderMap, StatusCode};
use thiserror::Error;
use tokengate_auth::{Identity, TokenClaims, TokenVerifier, VerificationOutcome};
use tracing::debug;

/// Why a request was turned away
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format")]
    MalformedHeader,

    #[error("Invalid or expired token")]
    InvalidOrExpired,
}

impl RejectKind {
    /// HTTP status for this rejection
    pub fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

/// Identity admitted by the guard, plus the verified claims it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub identity: Identity,
    pub claims: TokenClaims,
}

/// Outcome of guarding a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Request may proceed with this identity attached
    Admit(Admission),
    /// Request must be answered with `status` before reaching the handler
    Reject { status: StatusCode, kind: RejectKind },
}

impl GuardDecision {
    fn reject(kind: RejectKind) -> Self {
        GuardDecision::Reject {
            status: kind.status(),
            kind,
        }
    }
}

/// Bearer token gate in front of protected handlers
///
/// Holds only the shared, read-only verifier, so one guard can serve any
/// number of concurrent requests.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    verifier: Arc<TokenVerifier>,
}

impl AccessGuard {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Guard a request against the current time
    pub fn check(&self, headers: &HeaderMap) -> GuardDecision {
        self.check_at(headers, Utc::now())
    }

    /// Guard a request as if the current time were `now`
    pub fn check_at(&self, headers: &HeaderMap, now: DateTime<Utc>) -> GuardDecision {
        let token = match extract_bearer_token(headers) {
            Ok(token) => token,
            Err(kind) => {
                debug!("Bearer auth: {}", kind);
                return GuardDecision::reject(kind);
            }
        };

        match self.verifier.verify_at(token, now) {
            VerificationOutcome::Valid(claims) => {
                debug!(sub = %claims.sub, "Bearer auth: valid token");
                GuardDecision::Admit(Admission {
                    identity: claims.identity(),
                    claims,
                })
            }
            VerificationOutcome::Invalid(reason) => {
                debug!(%reason, "Bearer auth: invalid token");
                GuardDecision::reject(RejectKind::InvalidOrExpired)
            }
        }
    }
}
