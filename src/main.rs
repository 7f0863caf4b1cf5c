//! tokengate - bearer token login and protected routes over HTTP

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Settings;
use tokengate_api::{ApiServer, ApiServerConfig, AppState};
use tokengate_auth::{StaticCredentialStore, TokenIssuer, TokenVerifier};

/// Issue and verify bearer tokens for protected HTTP routes
#[derive(Parser, Debug)]
#[command(name = "tokengate")]
#[command(about = "Issue and verify bearer tokens for protected HTTP routes", long_about = None)]
#[command(version)]
struct Cli {
    /// Secret used to sign and verify tokens (required)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Token lifetime in seconds
    #[arg(long, env = "TOKEN_TTL_SECS", default_value = "3600")]
    token_ttl_secs: i64,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let settings = Settings::new(cli.jwt_secret, cli.host, cli.port, cli.token_ttl_secs)
        .context("Invalid configuration")?;

    let issuer = TokenIssuer::new(settings.signing_key.clone())
        .with_lifetime(settings.token_lifetime)
        .context("Invalid token lifetime")?;
    let verifier = TokenVerifier::new(&settings.signing_key);
    let credentials = Arc::new(StaticCredentialStore::demo());

    info!(
        lifetime_secs = settings.token_lifetime.num_seconds(),
        users = credentials.len(),
        "Token issuer ready"
    );

    let server = ApiServer::new(
        ApiServerConfig {
            bind_addr: settings.bind_addr,
        },
        AppState::new(issuer, verifier, credentials),
    );

    server.start().await
}

fn init_logging(log_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to initialize logging filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}
