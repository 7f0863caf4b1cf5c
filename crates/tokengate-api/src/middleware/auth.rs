//! Bearer token authentication middleware
//!
//! Runs the [`AccessGuard`](tokengate_http_auth::AccessGuard) on every
//! request to a protected route. Admitted requests continue with the
//! [`Admission`] (identity plus verified claims) available to handlers via
//! Axum's `Extension`; everything else is answered with 401 before the
//! handler runs.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tokengate_http_auth::{Admission, GuardDecision};

use crate::error::ApiError;
use crate::AppState;

/// Authentication middleware for protected routes
///
/// # Errors
/// Returns 401 Unauthorized if:
/// - The Authorization header is missing
/// - The header is not exactly `Bearer <token>`
/// - The token is malformed, wrongly signed or expired
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match state.guard.check(request.headers()) {
        GuardDecision::Admit(admission) => {
            request.extensions_mut().insert::<Admission>(admission);
            Ok(next.run(request).await)
        }
        GuardDecision::Reject { kind, .. } => Err(ApiError::Unauthorized(kind)),
    }
}
