mod auth;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use log::info;
use tracing_subscriber::EnvFilter;

use outreach::prospects::ProspectClient;
use outreach::secrets::{CredentialCipher, CREDENTIAL_KEY_ENV_VAR};

use crate::auth::AuthKeys;
use crate::state::{default_data_dir, AppState};

/// Request bodies (JSON and uploads alike) are capped at 10 MB.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

fn init_tracing() {
    // Library modules log via the `log` facade; bridge them into tracing
    // before the subscriber goes live.
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize log bridge: {}", e);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize tracing subscriber: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("Starting outreach-server v{}", env!("CARGO_PKG_VERSION"));

    let cipher = match CredentialCipher::from_env() {
        Ok(cipher) => cipher,
        Err(e) => {
            eprintln!(
                "Cannot start without a credential key: {}\n\
                 Set {} to a 64-character hex string (32 random bytes).",
                e, CREDENTIAL_KEY_ENV_VAR
            );
            std::process::exit(1);
        }
    };

    let jwt_secret = match std::env::var("OUTREACH_JWT_SECRET") {
        Ok(secret) if !secret.trim().is_empty() => secret,
        _ => {
            eprintln!("Cannot start without OUTREACH_JWT_SECRET set to a non-empty value.");
            std::process::exit(1);
        }
    };

    let data_dir = std::env::var("OUTREACH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_data_dir());
    info!("Using data directory: {:?}", data_dir);

    let state = Arc::new(AppState::new(
        data_dir,
        cipher,
        AuthKeys::from_secret(jwt_secret.as_bytes()),
        ProspectClient::from_env(),
    ));
    state.init_mailer().await;

    let app = routes::router(state).layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    let bind = std::env::var("OUTREACH_HTTP_BIND").unwrap_or_else(|_| "127.0.0.1:3001".to_string());
    let addr: SocketAddr = bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("outreach-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
