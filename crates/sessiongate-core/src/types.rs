//! Shared domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile attributes carried by an authenticated session.
///
/// Fields are resolved once, when the session is created: `display_name`
/// falls back through given+family name and username down to `"Unknown"`,
/// and `email` falls back to `"No email"`. Readers never re-derive them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Resolved display name; never empty.
    pub display_name: String,
    /// Preferred username claim, possibly empty.
    pub username: String,
    /// Resolved primary email; never empty.
    pub email: String,
}

/// One authenticated principal.
///
/// At most one `Session` exists per `user_id` at any time; a re-login
/// replaces the previous value wholesale. Sessions are never mutated in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Stable subject identifier from the identity provider.
    pub user_id: String,
    /// Locally generated identifier for this login instance.
    pub session_id: Uuid,
    /// Profile resolved from identity claims at login.
    pub profile: UserProfile,
    /// When the session was created.
    pub login_time: DateTime<Utc>,
}

impl Session {
    /// Creates a session for the given subject with a fresh session id.
    pub fn new(user_id: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: Uuid::new_v4(),
            profile,
            login_time: Utc::now(),
        }
    }
}

/// Authentication status of one caller, as reported to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// Whether the caller presented a browser session with an identity.
    pub authenticated: bool,
    /// Whether a server-side session is active for that identity.
    pub session_active: bool,
}
