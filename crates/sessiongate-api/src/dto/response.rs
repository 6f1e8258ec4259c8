//! Outbound response types.
//!
//! Wire field names are camelCase; timestamps are RFC 3339.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sessiongate_core::types::Session;

/// `/api/user` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserDto,
}

/// Authenticated user as the frontend sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<Session> for UserEnvelope {
    fn from(session: Session) -> Self {
        Self {
            user: UserDto {
                id: session.user_id,
                name: session.profile.display_name,
                email: session.profile.email,
            },
        }
    }
}

/// `/api/sessions` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

/// One active session in the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub login_time: DateTime<Utc>,
}

impl From<Session> for SessionSummary {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.session_id,
            user_id: session.user_id,
            user_name: session.profile.display_name,
            login_time: session.login_time,
        }
    }
}

/// `/auth/logout` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub logout_url: String,
}

/// Generic `{"status": ...}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Generic `{"message": ...}` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `/health` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
