//! Login, callback, and both logout paths.

use axum::Form;
use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use sessiongate_core::error::AppError;

use crate::dto::request::{BackchannelLogoutForm, CallbackQuery};
use crate::dto::response::{LogoutResponse, MessageResponse, StatusResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /auth/login` — starts a fresh login attempt.
///
/// Any previous browser session is discarded first, so a half-finished or
/// stale attempt can never satisfy the callback's state check. The minted
/// state is stored server-side; only the opaque browser id rides the cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let cookie_name = &state.config.session_cookie.cookie_name;
    if let Some(cookie) = jar.get(cookie_name) {
        state.browser_sessions.clear(cookie.value()).await;
    }

    let redirect = state.orchestrator.begin_login();
    let browser_id = state.browser_sessions.create().await;
    state
        .browser_sessions
        .put_state(&browser_id, &redirect.state)
        .await;

    let cookie = Cookie::build((cookie_name.clone(), browser_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::to(&redirect.authorization_url)))
}

/// `GET /auth/callback` — completes the login attempt.
///
/// The stored state is consumed on read, so replaying a callback URL fails
/// the state check even with the original cookie.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, ApiError> {
    let browser_id = jar
        .get(&state.config.session_cookie.cookie_name)
        .map(|cookie| cookie.value().to_string());

    let stored_state = match &browser_id {
        Some(id) => state.browser_sessions.take_state(id).await,
        None => None,
    };

    let session = state
        .orchestrator
        .complete_callback(
            stored_state.as_deref(),
            query.state.as_deref(),
            query.code.as_deref(),
        )
        .await?;

    if let Some(id) = &browser_id {
        state.browser_sessions.put_user(id, &session.user_id).await;
    }

    Ok(Redirect::to(&state.config.server.frontend_url))
}

/// `GET /auth/logout` — voluntary logout.
///
/// Clears the server session, every live event stream, and the browser
/// session; the response tells the frontend where to send the browser so the
/// provider session dies too. Safe without a cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let cookie_name = state.config.session_cookie.cookie_name.clone();
    let browser_id = jar.get(&cookie_name).map(|cookie| cookie.value().to_string());

    let user_id = match &browser_id {
        Some(id) => state.browser_sessions.user_id(id).await,
        None => None,
    };
    if let Some(id) = &browser_id {
        state.browser_sessions.clear(id).await;
    }

    let logout_url = match user_id {
        Some(user_id) => state.orchestrator.logout(&user_id),
        None => state.orchestrator.logout_url(),
    };

    let removal = Cookie::build((cookie_name, "")).path("/").build();
    Ok((jar.remove(removal), Json(LogoutResponse { logout_url })))
}

/// `POST /auth/backchannel-logout` — provider-initiated logout.
///
/// Responds with success whether or not a session was found; the provider
/// retries on anything else, and a repeat delivery has nothing left to do.
pub async fn backchannel_logout(
    State(state): State<AppState>,
    Form(form): Form<BackchannelLogoutForm>,
) -> Result<Json<StatusResponse>, ApiError> {
    let token = form
        .logout_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Missing logout_token form field"))?;

    state.orchestrator.backchannel_logout(&token).await?;

    Ok(Json(StatusResponse {
        status: "success".to_string(),
    }))
}

/// `GET /auth/backchannel-logout` — reachability probe.
///
/// Lets an operator confirm the provider can reach this endpoint without
/// crafting a logout token.
pub async fn backchannel_logout_probe() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Backchannel logout endpoint is reachable; the provider must POST here"
            .to_string(),
    })
}
