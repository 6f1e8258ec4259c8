//! OpenID Connect discovery against the provider's well-known endpoint.

use serde::{Deserialize, Serialize};

use sessiongate_core::config::provider::ProviderConfig;
use sessiongate_core::error::AppError;
use sessiongate_core::result::AppResult;

/// Subset of the OpenID Provider Metadata this service consumes.
///
/// Returned by `{issuer}/.well-known/openid-configuration`. Fields the
/// service never reads are left out; serde ignores them on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// URL of the authorization server's issuer identifier.
    pub issuer: String,
    /// URL of the authorization endpoint.
    pub authorization_endpoint: String,
    /// URL of the token endpoint.
    pub token_endpoint: String,
    /// URL of the JSON Web Key Set document.
    pub jwks_uri: String,
    /// URL of the end session (logout) endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_session_endpoint: Option<String>,
}

impl ProviderMetadata {
    /// Fetches the provider's discovery document for the configured realm.
    ///
    /// Called once at startup; a failure here is fatal because the service
    /// cannot authenticate anyone without a reachable identity provider.
    pub async fn discover(http: &reqwest::Client, config: &ProviderConfig) -> AppResult<Self> {
        let url = format!(
            "{}/.well-known/openid-configuration",
            config.issuer_url()
        );

        tracing::info!(url = %url, "Fetching OIDC discovery document");

        let response = http.get(&url).send().await.map_err(|e| {
            AppError::with_source(
                sessiongate_core::error::ErrorKind::ExternalService,
                format!("OIDC discovery request failed: {e}"),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "OIDC discovery returned HTTP {status}"
            )));
        }

        let metadata: ProviderMetadata = response.json().await.map_err(|e| {
            AppError::with_source(
                sessiongate_core::error::ErrorKind::ExternalService,
                format!("Failed to parse OIDC discovery document: {e}"),
                e,
            )
        })?;

        tracing::info!(
            issuer = %metadata.issuer,
            authorization_endpoint = %metadata.authorization_endpoint,
            "OIDC discovery complete"
        );

        Ok(metadata)
    }
}
