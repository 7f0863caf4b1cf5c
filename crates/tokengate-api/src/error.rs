//! API error type and its HTTP mapping

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tokengate_auth::TokenError;
use tokengate_http_auth::RejectKind;

use crate::models::ErrorResponse;

/// Errors surfaced by handlers and middleware
///
/// Client-facing messages are fixed strings; details of unexpected faults
/// only go to the server log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Username and password required")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Unauthorized(#[from] RejectKind),

    #[error("token signing failed: {0}")]
    Signing(#[from] TokenError),

    #[error("unreadable request body: {0}")]
    Body(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(kind) => kind.status(),
            ApiError::Signing(_) | ApiError::Body(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut response = (status, Json(ErrorResponse { error: message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
