use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        State,
    },
    http::{header, HeaderMap},
    response::Html,
    Extension, Json,
};
use std::sync::Arc;
use tokengate_http_auth::Admission;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::*;
use crate::AppState;

const DEMO_PAGE: &str = include_str!("../assets/demo.html");

/// Service banner listing the available endpoints
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = RootResponse)
    ),
    tag = "system"
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "API is up".to_string(),
        endpoints: ["/public", "/login", "/profile", "/demo"]
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

/// Unprotected endpoint
#[utoipa::path(
    get,
    path = "/public",
    responses(
        (status = 200, description = "Public data", body = MessageResponse)
    ),
    tag = "system"
)]
pub async fn public() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "This is a public endpoint".to_string(),
    })
}

/// Exchange a username and password for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Username or password missing", body = ErrorResponse),
        (status = 401, description = "Credentials rejected", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let body = body.map_err(|e| ApiError::Body(e.body_text()))?;
    let request = parse_login_body(&headers, &body)?;

    let (username, password) = request
        .credentials()
        .ok_or(ApiError::MissingCredentials)?;

    let identity = state
        .credentials
        .authenticate(username, password)
        .await
        .ok_or_else(|| {
            debug!("Login rejected");
            ApiError::InvalidCredentials
        })?;

    let token = state.issuer.issue(&identity)?;

    info!(sub = %identity.subject_id, "Login succeeded");

    Ok(Json(LoginResponse {
        token: token.into_string(),
    }))
}

/// An empty or non-JSON body reads as an empty request
fn parse_login_body(headers: &HeaderMap, body: &Bytes) -> Result<LoginRequest, ApiError> {
    if body.is_empty() || !has_json_content_type(headers) {
        return Ok(LoginRequest::default());
    }

    match Json::<LoginRequest>::from_bytes(body) {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::JsonDataError(e)) => {
            debug!("Login body has unexpected shape: {}", e.body_text());
            Err(ApiError::MissingCredentials)
        }
        Err(e) => Err(ApiError::Body(e.body_text())),
    }
}

/// `application/json` or any `+json` media type, parameters ignored
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Protected resource; requires a valid bearer token
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Protected data", body = ProfileResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse)
    ),
    security(
        ("bearer" = [])
    ),
    tag = "auth"
)]
pub async fn profile(Extension(admission): Extension<Admission>) -> Json<ProfileResponse> {
    debug!(sub = %admission.identity.subject_id, "Serving profile");

    Json(ProfileResponse {
        message: "Protected data".to_string(),
        user: admission.claims.into(),
    })
}

/// Browser page that exercises `/public`, `/login` and `/profile`
pub async fn demo() -> Html<&'static str> {
    Html(DEMO_PAGE)
}

/// Unknown paths and unsupported methods on known paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
