//! Login/logout state machine.

use std::sync::Arc;

use sessiongate_auth::logout_token::LogoutTokenValidator;
use sessiongate_auth::provider::client::IdentityProviderClient;
use sessiongate_auth::provider::verifier::IdentityTokenVerifier;
use sessiongate_auth::state::generate_state;
use sessiongate_core::error::AppError;
use sessiongate_core::result::AppResult;
use sessiongate_core::types::{Session, SessionStatus};
use sessiongate_realtime::{EventHub, SessionRegistry};

use crate::profile::extract_profile;

/// Event published to a user's streams when the provider invalidates their
/// session behind the browser's back.
pub const SESSION_INVALIDATED_EVENT: &str = "session_invalidated";

/// Everything a login handler needs to redirect the browser.
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    /// Anti-forgery state to stash against the browser session.
    pub state: String,
    /// Provider authorization URL carrying that state.
    pub authorization_url: String,
}

/// Drives a principal through login, callback verification, and both logout
/// paths.
///
/// The orchestrator owns no HTTP concerns: cookies, redirects, and status
/// codes belong to the API layer. It composes the provider client, the token
/// verifier, and the shared session/event state, and is cheap to clone behind
/// an `Arc`.
pub struct AuthOrchestrator {
    provider: Arc<IdentityProviderClient>,
    verifier: Arc<IdentityTokenVerifier>,
    logout_tokens: LogoutTokenValidator,
    sessions: Arc<SessionRegistry>,
    events: Arc<EventHub>,
    frontend_url: String,
}

impl AuthOrchestrator {
    pub fn new(
        provider: Arc<IdentityProviderClient>,
        verifier: Arc<IdentityTokenVerifier>,
        sessions: Arc<SessionRegistry>,
        events: Arc<EventHub>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            verifier,
            logout_tokens: LogoutTokenValidator::new(),
            sessions,
            events,
            frontend_url: frontend_url.into(),
        }
    }

    /// Starts a login attempt: fresh anti-forgery state plus the provider
    /// authorization URL that carries it.
    pub fn begin_login(&self) -> LoginRedirect {
        let state = generate_state();
        let authorization_url = self.provider.authorization_url(&state);
        LoginRedirect {
            state,
            authorization_url,
        }
    }

    /// Completes the callback leg: state equality, code exchange, ID-token
    /// verification, and session creation.
    ///
    /// The state check runs before anything touches the network; a missing
    /// stored state (expired browser session, replayed callback) fails the
    /// same way as a mismatch. On success the new session replaces any
    /// previous one for the same subject.
    pub async fn complete_callback(
        &self,
        stored_state: Option<&str>,
        returned_state: Option<&str>,
        code: Option<&str>,
    ) -> AppResult<Session> {
        match (stored_state, returned_state) {
            (Some(stored), Some(returned)) if stored == returned => {}
            _ => {
                return Err(AppError::state_mismatch(
                    "Callback state does not match the login attempt",
                ));
            }
        }

        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::missing_code("Callback carries no authorization code"))?;

        let tokens = self.provider.exchange_code(code).await?;
        let id_token = tokens.id_token.ok_or_else(|| {
            AppError::exchange_failed("Token response carries no ID token")
        })?;

        let claims = self.verifier.verify(&id_token).await?;
        let user_id = claims
            .get("sub")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::verification_failed("ID token carries no subject claim"))?
            .to_string();

        let session = Session::new(user_id, extract_profile(&claims));
        if self.sessions.insert(session.clone()).is_some() {
            tracing::info!(user_id = %session.user_id, "re-login replaced existing session");
        } else {
            tracing::info!(user_id = %session.user_id, "session created");
        }
        Ok(session)
    }

    /// Voluntary logout: drops the session and every live event stream, and
    /// returns the provider logout URL the browser should visit next.
    ///
    /// Succeeds even when no session is active.
    pub fn logout(&self, user_id: &str) -> String {
        let removed = self.sessions.remove(user_id).is_some();
        let dropped = self.events.unsubscribe_all(user_id);
        tracing::info!(
            user_id = %user_id,
            session_removed = removed,
            streams_dropped = dropped,
            "logout"
        );
        self.logout_url()
    }

    /// Provider logout URL redirecting back to the frontend; the answer for
    /// a logout request with no identity attached.
    pub fn logout_url(&self) -> String {
        self.provider.logout_url(&self.frontend_url)
    }

    /// Provider-initiated logout over the backchannel.
    ///
    /// Returns whether a session was actually removed; an already-cleared
    /// subject succeeds as a no-op, so provider retries are harmless. Live
    /// streams are notified but stay open — each client decides how to react.
    pub async fn backchannel_logout(&self, raw_token: &str) -> AppResult<bool> {
        let claims = self.logout_tokens.parse(raw_token)?;

        let Some(_session) = self.sessions.remove(&claims.sub) else {
            tracing::info!(user_id = %claims.sub, "backchannel logout for inactive session");
            return Ok(false);
        };

        let delivered = self
            .events
            .publish(&claims.sub, SESSION_INVALIDATED_EVENT)
            .await;
        tracing::info!(
            user_id = %claims.sub,
            delivered,
            "backchannel logout invalidated session"
        );
        Ok(true)
    }

    /// Status pair for the frontend poll: cookie identity presence and
    /// server-side session liveness.
    pub fn session_status(&self, user_id: Option<&str>) -> SessionStatus {
        match user_id {
            Some(user_id) => SessionStatus {
                authenticated: true,
                session_active: self.sessions.contains(user_id),
            },
            None => SessionStatus {
                authenticated: false,
                session_active: false,
            },
        }
    }

    /// The user's active session, or `Authentication` if the provider has
    /// already invalidated it.
    pub fn current_user(&self, user_id: &str) -> AppResult<Session> {
        self.sessions
            .get(user_id)
            .ok_or_else(|| AppError::authentication("No active session"))
    }

    /// Point-in-time copy of all active sessions.
    pub fn list_sessions(&self) -> Vec<Session> {
        self.sessions.snapshot()
    }
}

impl std::fmt::Debug for AuthOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthOrchestrator")
            .field("frontend_url", &self.frontend_url)
            .finish_non_exhaustive()
    }
}
