//! Identity provider configuration.

use serde::{Deserialize, Serialize};

/// OpenID Connect identity provider configuration.
///
/// The provider is addressed Keycloak-style: the issuer for a realm lives at
/// `{base_url}/realms/{realm}`, and all endpoints are resolved from the
/// discovery document published under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the identity provider (no trailing slash required).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Realm name.
    #[serde(default = "default_realm")]
    pub realm: String,
    /// OAuth2 client identifier registered with the provider.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// OAuth2 client secret. Required; there is no default.
    pub client_secret: String,
    /// Redirect URI registered for the authorization-code callback.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// Outer timeout for provider HTTP calls in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// How long fetched signing keys stay cached in seconds.
    #[serde(default = "default_jwks_ttl")]
    pub jwks_ttl_seconds: u64,
}

impl ProviderConfig {
    /// Returns the issuer URL for the configured realm.
    pub fn issuer_url(&self) -> String {
        format!("{}/realms/{}", self.base_url.trim_end_matches('/'), self.realm)
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_realm() -> String {
    "demo".to_string()
}

fn default_client_id() -> String {
    "demo-client".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:3001/auth/callback".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

fn default_jwks_ttl() -> u64 {
    3600
}
