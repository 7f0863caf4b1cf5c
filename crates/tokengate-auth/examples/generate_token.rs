//! Generate a signed token for manual testing
//!
//! Usage:
//!   cargo run -p tokengate-auth --example generate_token -- --secret "your-secret-key"
//!   cargo run -p tokengate-auth --example generate_token -- --subject 42 --username alice

use chrono::Duration;
use clap::Parser;
use tokengate_auth::{Identity, SigningKey, TokenIssuer};

#[derive(Parser, Debug)]
#[command(name = "generate_token")]
#[command(about = "Generate a signed bearer token", long_about = None)]
struct Args {
    /// Signing secret (must match the server's JWT_SECRET)
    #[arg(long, env = "JWT_SECRET")]
    secret: String,

    /// Subject id
    #[arg(long, default_value = "1")]
    subject: String,

    /// Display name
    #[arg(long, default_value = "admin")]
    username: String,

    /// Token validity in seconds
    #[arg(long, default_value = "3600")]
    ttl_secs: i64,
}

fn main() {
    let args = Args::parse();

    let lifetime = Duration::try_seconds(args.ttl_secs)
        .ok_or_else(|| format!("ttl of {} seconds is out of range", args.ttl_secs));

    let issuer = SigningKey::new(args.secret.into_bytes())
        .map_err(|e| e.to_string())
        .and_then(|key| {
            TokenIssuer::new(key)
                .with_lifetime(lifetime?)
                .map_err(|e| e.to_string())
        });

    let identity = Identity::new(args.subject, args.username);

    match issuer.and_then(|issuer| issuer.issue(&identity).map_err(|e| e.to_string())) {
        Ok(token) => {
            println!("Subject:   {}", identity.subject_id);
            println!("Valid for: {} seconds", args.ttl_secs);
            println!("\nToken:\n{}\n", token);
            println!("Usage:");
            println!(
                "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/profile",
                token
            );
        }
        Err(e) => {
            eprintln!("Failed to generate token: {}", e);
            std::process::exit(1);
        }
    }
}
