use serde::{Deserialize, Serialize};
use tokengate_auth::TokenClaims;
use utoipa::ToSchema;

/// Service banner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    /// Endpoints worth trying
    pub endpoints: Vec<String>,
}

/// Plain message payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// User login request
///
/// Both fields are optional at the wire level so that a missing field is
/// reported as a bad request instead of a body decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// Account name
    pub username: Option<String>,
    /// Account password
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both fields, if present and non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

/// User login response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
}

/// Claims attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    /// Subject id
    pub sub: String,
    /// Display name
    pub username: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl From<TokenClaims> for AuthUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            sub: claims.sub,
            username: claims.username,
            iat: claims.iat,
            exp: claims.exp,
        }
    }
}

/// Protected resource payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub message: String,
    /// Caller identity taken from the verified token
    pub user: AuthUser,
}

/// Error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
