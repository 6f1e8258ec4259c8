//! Session inspection endpoints.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;

use sessiongate_core::types::SessionStatus;

use crate::dto::response::{SessionListResponse, UserEnvelope};
use crate::error::ApiError;
use crate::extractors::AuthenticatedBrowser;
use crate::state::AppState;

/// `GET /api/user` — the caller's active session.
///
/// A cookie identity whose server session was invalidated over the
/// backchannel gets 401 here, which is what flips the frontend to the
/// logged-out view.
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthenticatedBrowser,
) -> Result<Json<UserEnvelope>, ApiError> {
    let session = state.orchestrator.current_user(&auth.user_id)?;
    Ok(Json(UserEnvelope::from(session)))
}

/// `GET /api/sessions` — all active sessions.
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let sessions = state
        .orchestrator
        .list_sessions()
        .into_iter()
        .map(Into::into)
        .collect();
    Json(SessionListResponse { sessions })
}

/// `GET /api/session-status` — cookie identity and session liveness.
///
/// Public: an anonymous caller simply reads `false`/`false`.
pub async fn session_status(State(state): State<AppState>, jar: CookieJar) -> Json<SessionStatus> {
    let user_id = match jar.get(&state.config.session_cookie.cookie_name) {
        Some(cookie) => state.browser_sessions.user_id(cookie.value()).await,
        None => None,
    };
    Json(state.orchestrator.session_status(user_id.as_deref()))
}
