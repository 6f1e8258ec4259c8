//! Identity-provider client — authorization URL, code exchange, logout URL.

use serde::Deserialize;

use sessiongate_core::config::provider::ProviderConfig;
use sessiongate_core::error::AppError;
use sessiongate_core::result::AppResult;

use super::discovery::ProviderMetadata;

/// Scopes requested on every login.
const SCOPES: &str = "openid profile email";

/// Token endpoint response for the authorization-code grant.
///
/// `id_token` is an extra field on top of the OAuth2 response; the callback
/// flow requires it and treats its absence as a failed exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// OAuth2 access token (unused beyond the exchange itself).
    pub access_token: String,
    /// Seconds until the access token expires.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// The OIDC identity token.
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Client for the configured OpenID Connect provider.
///
/// Holds the discovered endpoint set; all provider-side failures during the
/// exchange collapse to a single `ExchangeFailed` kind — callers never branch
/// on provider error detail, the raw cause is only logged.
#[derive(Debug, Clone)]
pub struct IdentityProviderClient {
    http: reqwest::Client,
    config: ProviderConfig,
    metadata: ProviderMetadata,
}

impl IdentityProviderClient {
    /// Creates a client from the configuration and discovered metadata.
    pub fn new(http: reqwest::Client, config: ProviderConfig, metadata: ProviderMetadata) -> Self {
        Self {
            http,
            config,
            metadata,
        }
    }

    /// Returns the discovered provider metadata.
    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    /// Builds the authorization redirect URL for one login attempt.
    ///
    /// Deterministic, no I/O; the caller supplies the anti-forgery state.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.metadata.authorization_endpoint,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchanges an authorization code for tokens at the token endpoint.
    pub async fn exchange_code(&self, code: &str) -> AppResult<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(&self.metadata.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Token exchange request failed");
                AppError::exchange_failed("Token exchange request failed")
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Token endpoint returned error");
            return Err(AppError::exchange_failed(format!(
                "Token endpoint returned HTTP {status}"
            )));
        }

        response.json::<TokenResponse>().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse token response");
            AppError::exchange_failed("Failed to parse token response")
        })
    }

    /// Returns the provider logout URL the browser should be redirected to.
    ///
    /// Falls back to the Keycloak path convention when the discovery document
    /// carries no end-session endpoint.
    pub fn logout_url(&self, frontend_url: &str) -> String {
        let endpoint = self
            .metadata
            .end_session_endpoint
            .clone()
            .unwrap_or_else(|| format!("{}/protocol/openid-connect/logout", self.metadata.issuer));

        format!(
            "{}?redirect_uri={}",
            endpoint,
            urlencoding::encode(frontend_url)
        )
    }
}
