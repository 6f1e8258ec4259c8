//! Session registry — active sessions indexed by user ID.

use dashmap::DashMap;

use sessiongate_core::types::Session;

/// Thread-safe store of all active sessions.
///
/// At most one session per user: a new login replaces the previous entry
/// wholesale. Lookups and snapshots proceed concurrently; mutation is
/// exclusive per shard. Nothing here blocks on I/O.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Inserts a session, returning the replaced one if the user was already
    /// logged in.
    pub fn insert(&self, session: Session) -> Option<Session> {
        self.sessions.insert(session.user_id.clone(), session)
    }

    /// Returns a clone of the user's session, if active.
    pub fn get(&self, user_id: &str) -> Option<Session> {
        self.sessions.get(user_id).map(|entry| entry.value().clone())
    }

    /// Whether a session is active for the user.
    pub fn contains(&self, user_id: &str) -> bool {
        self.sessions.contains_key(user_id)
    }

    /// Removes the user's session, returning it if one was active.
    pub fn remove(&self, user_id: &str) -> Option<Session> {
        self.sessions.remove(user_id).map(|(_, session)| session)
    }

    /// Returns a point-in-time copy of all active sessions.
    ///
    /// Never a live view: iteration over the copy cannot race with
    /// concurrent mutation, though it may be stale by the time it is read.
    pub fn snapshot(&self) -> Vec<Session> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
