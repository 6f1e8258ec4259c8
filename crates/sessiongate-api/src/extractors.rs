//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use sessiongate_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Identity resolved from the browser session cookie.
///
/// Rejects with 401 when the cookie is absent or the server-side entry has no
/// bound user. It deliberately does not check the [`SessionRegistry`]: a
/// backchannel-invalidated session still has a cookie identity, and handlers
/// that care about liveness check the registry themselves.
///
/// [`SessionRegistry`]: sessiongate_realtime::SessionRegistry
#[derive(Debug, Clone)]
pub struct AuthenticatedBrowser {
    /// Cookie id of the browser session.
    pub browser_id: String,
    /// Subject bound to that browser.
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthenticatedBrowser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let browser_id = jar
            .get(&state.config.session_cookie.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| AppError::authentication("Not authenticated"))?;

        let user_id = state
            .browser_sessions
            .user_id(&browser_id)
            .await
            .ok_or_else(|| AppError::authentication("Not authenticated"))?;

        Ok(Self {
            browser_id,
            user_id,
        })
    }
}
