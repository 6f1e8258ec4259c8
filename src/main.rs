//! SessionGate Server — OIDC login service with backchannel logout.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use sessiongate_auth::provider::client::IdentityProviderClient;
use sessiongate_auth::provider::discovery::ProviderMetadata;
use sessiongate_auth::provider::verifier::IdentityTokenVerifier;
use sessiongate_core::config::AppConfig;
use sessiongate_core::error::AppError;
use sessiongate_realtime::{EventHub, SessionRegistry};
use sessiongate_service::AuthOrchestrator;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SESSIONGATE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SessionGate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Outbound HTTP client ─────────────────────────────
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.provider.http_timeout_seconds))
        .build()
        .map_err(|e| AppError::internal(format!("HTTP client init failed: {}", e)))?;

    // ── Step 2: Provider discovery (fatal on failure) ────────────
    tracing::info!(
        issuer = %config.provider.issuer_url(),
        "Discovering identity provider..."
    );
    let metadata = ProviderMetadata::discover(&http, &config.provider).await?;
    tracing::info!(
        authorization_endpoint = %metadata.authorization_endpoint,
        token_endpoint = %metadata.token_endpoint,
        "Identity provider discovered"
    );

    // ── Step 3: Auth components ──────────────────────────────────
    let verifier = Arc::new(IdentityTokenVerifier::new(
        http.clone(),
        metadata.jwks_uri.clone(),
        metadata.issuer.clone(),
        config.provider.client_id.clone(),
        Duration::from_secs(config.provider.jwks_ttl_seconds),
    ));
    let provider = Arc::new(IdentityProviderClient::new(
        http,
        config.provider.clone(),
        metadata,
    ));

    // ── Step 4: Shared state ─────────────────────────────────────
    let sessions = Arc::new(SessionRegistry::new());
    let events = Arc::new(EventHub::new(&config.events));
    let browser_sessions = Arc::new(sessiongate_api::browser_session::BrowserSessionStore::new(
        &config.session_cookie,
    ));

    let orchestrator = Arc::new(AuthOrchestrator::new(
        provider,
        verifier,
        Arc::clone(&sessions),
        Arc::clone(&events),
        config.server.frontend_url.clone(),
    ));

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app_state = sessiongate_api::AppState {
        config: Arc::new(config.clone()),
        orchestrator,
        sessions,
        events,
        browser_sessions,
    };

    let app = sessiongate_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("SessionGate server listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("SessionGate server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
