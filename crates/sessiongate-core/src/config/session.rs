//! Browser session cookie configuration.

use serde::{Deserialize, Serialize};

/// Browser session store and cookie configuration.
///
/// Session data lives server-side; the cookie only carries an opaque
/// identifier into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookieConfig {
    /// Name of the browser session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Server-side entry lifetime in hours.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Upper bound on concurrently tracked browser sessions.
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_hours: default_ttl_hours(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_cookie_name() -> String {
    "sessiongate_sid".to_string()
}

fn default_ttl_hours() -> u64 {
    24
}

fn default_max_entries() -> u64 {
    10_000
}
