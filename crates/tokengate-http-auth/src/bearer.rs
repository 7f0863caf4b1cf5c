//! Bearer token extraction (RFC 6750)
//!
//! # Format
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! The scheme is matched case-sensitively and must be followed by exactly
//! one space and a non-empty token without further whitespace.

use http::{header::AUTHORIZATION, HeaderMap};

use crate::RejectKind;

const SCHEME_PREFIX: &str = "Bearer ";

/// Pull the bearer token out of the request headers
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, RejectKind> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(RejectKind::MissingHeader)?;

    // Non visible-ASCII values can't carry a compact JWT
    let value = value.to_str().map_err(|_| RejectKind::MalformedHeader)?;

    parse_bearer(value).ok_or(RejectKind::MalformedHeader)
}

fn parse_bearer(value: &str) -> Option<&str> {
    let token = value.strip_prefix(SCHEME_PREFIX)?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}
