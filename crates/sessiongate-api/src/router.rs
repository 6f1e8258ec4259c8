//! Route definitions for the SessionGate HTTP API.
//!
//! Browser-facing auth routes live at the root; JSON/stream routes are
//! mounted under `/api`. The router receives `AppState` and passes it to all
//! handlers via axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Request bodies are tiny (one form field at most); anything bigger is
/// rejected outright.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the complete axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(auth_routes())
        .nest("/api", api_routes())
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Browser redirect flow plus the provider backchannel.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(handlers::auth::login))
        .route("/auth/callback", get(handlers::auth::callback))
        .route("/auth/logout", get(handlers::auth::logout))
        .route(
            "/auth/backchannel-logout",
            post(handlers::auth::backchannel_logout)
                .get(handlers::auth::backchannel_logout_probe),
        )
}

/// Frontend data endpoints.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(handlers::session::current_user))
        .route("/events", get(handlers::events::subscribe_events))
        .route("/sessions", get(handlers::session::list_sessions))
        .route("/session-status", get(handlers::session::session_status))
}
