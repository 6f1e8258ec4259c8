//! Server-side browser sessions keyed by an opaque cookie id.

use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use sessiongate_core::config::session::SessionCookieConfig;

/// What the server remembers about one browser.
///
/// Before the callback completes only `state` is set; afterwards only
/// `user_id`. The cookie itself never carries either.
#[derive(Debug, Clone, Default)]
pub struct BrowserSession {
    /// Pending anti-forgery state, cleared on first read.
    pub state: Option<String>,
    /// Authenticated subject, set after a successful callback.
    pub user_id: Option<String>,
}

/// TTL-bounded store of [`BrowserSession`] entries.
///
/// Entries expire a fixed time after creation, so an abandoned login attempt
/// or a dormant browser ages out without any sweep task. Capacity is bounded;
/// over it, the least recently used browsers are evicted and simply have to
/// log in again.
pub struct BrowserSessionStore {
    entries: Cache<String, BrowserSession>,
}

impl BrowserSessionStore {
    pub fn new(config: &SessionCookieConfig) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(Duration::from_secs(config.ttl_hours * 3600))
                .build(),
        }
    }

    /// Mints a new browser session and returns its cookie id.
    pub async fn create(&self) -> String {
        let browser_id = Uuid::new_v4().to_string();
        self.entries
            .insert(browser_id.clone(), BrowserSession::default())
            .await;
        browser_id
    }

    /// Stores the pending anti-forgery state for the browser.
    pub async fn put_state(&self, browser_id: &str, state: &str) {
        let mut entry = self.entries.get(browser_id).await.unwrap_or_default();
        entry.state = Some(state.to_string());
        self.entries.insert(browser_id.to_string(), entry).await;
    }

    /// Reads and clears the pending state, making it single-use.
    ///
    /// The whole entry is removed in one atomic step, so concurrent callbacks
    /// racing on the same cookie cannot both observe the state; a bound user
    /// id is re-inserted afterwards. A replayed callback sees `None` here and
    /// fails the state check.
    pub async fn take_state(&self, browser_id: &str) -> Option<String> {
        let BrowserSession { state, user_id } = self.entries.remove(browser_id).await?;
        if user_id.is_some() {
            self.entries
                .insert(browser_id.to_string(), BrowserSession { state: None, user_id })
                .await;
        }
        state
    }

    /// Binds the authenticated subject to the browser.
    pub async fn put_user(&self, browser_id: &str, user_id: &str) {
        let mut entry = self.entries.get(browser_id).await.unwrap_or_default();
        entry.user_id = Some(user_id.to_string());
        self.entries.insert(browser_id.to_string(), entry).await;
    }

    /// The subject bound to the browser, if any.
    pub async fn user_id(&self, browser_id: &str) -> Option<String> {
        self.entries.get(browser_id).await?.user_id
    }

    /// Drops the browser session entirely.
    pub async fn clear(&self, browser_id: &str) {
        self.entries.invalidate(browser_id).await;
    }
}

impl std::fmt::Debug for BrowserSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSessionStore")
            .field("entries", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}
