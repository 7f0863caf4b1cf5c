pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokengate_auth::{CredentialStore, TokenIssuer, TokenVerifier};
use tokengate_http_auth::AccessGuard;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

pub use error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    pub issuer: TokenIssuer,
    pub guard: AccessGuard,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            issuer,
            guard: AccessGuard::new(Arc::new(verifier)),
            credentials,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "tokengate API",
        version = "0.1.0",
        description = "Bearer token login and protected routes"
    ),
    paths(
        handlers::root,
        handlers::public,
        handlers::login,
        handlers::profile,
    ),
    components(
        schemas(
            models::RootResponse,
            models::MessageResponse,
            models::LoginRequest,
            models::LoginResponse,
            models::AuthUser,
            models::ProfileResponse,
            models::ErrorResponse,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "auth", description = "Login and token protected endpoints"),
        (name = "system", description = "Public and informational endpoints")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        // Build PUBLIC routes (no authentication required)
        let public_router = Router::new()
            .route("/", get(handlers::root))
            .route("/public", get(handlers::public))
            .route("/login", post(handlers::login))
            .route("/demo", get(handlers::demo))
            .route("/openapi.json", get(openapi_json))
            .with_state(self.state.clone());

        // Build PROTECTED routes (require a bearer token)
        let protected_router = Router::new()
            .route("/profile", get(handlers::profile))
            .route_layer(axum_middleware::from_fn_with_state(
                self.state.clone(),
                middleware::require_auth,
            ))
            .with_state(self.state.clone());

        public_router
            .merge(protected_router)
            .fallback(handlers::not_found)
            .method_not_allowed_fallback(handlers::not_found)
            .layer(TraceLayer::new_for_http())
    }

    /// Start the API server and run until Ctrl-C
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        info!("Starting API server on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        info!("API server stopped");
        Ok(())
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
