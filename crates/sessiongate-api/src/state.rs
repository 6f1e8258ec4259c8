//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sessiongate_core::config::AppConfig;
use sessiongate_realtime::{EventHub, SessionRegistry};
use sessiongate_service::AuthOrchestrator;

use crate::browser_session::BrowserSessionStore;

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Login/logout state machine
    pub orchestrator: Arc<AuthOrchestrator>,
    /// Active sessions by user id
    pub sessions: Arc<SessionRegistry>,
    /// Per-user event fan-out
    pub events: Arc<EventHub>,
    /// Cookie-id → browser session entries
    pub browser_sessions: Arc<BrowserSessionStore>,
}
