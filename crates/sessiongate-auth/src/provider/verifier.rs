//! Identity-token verification against the provider's published JWKS.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;

use sessiongate_core::error::AppError;
use sessiongate_core::result::AppResult;

/// Clock skew leeway for expiry validation, in seconds.
const LEEWAY_SECS: u64 = 60;

/// Open claim set decoded from a verified identity token.
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// JWKS response structure (RFC 7517).
#[derive(Debug, Clone, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// Individual key from a JWKS endpoint. The provider signs with RSA keys.
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: Option<String>,
    kty: String,
    alg: Option<String>,
    /// RSA modulus (base64url encoded).
    n: Option<String>,
    /// RSA exponent (base64url encoded).
    e: Option<String>,
}

/// Verifies identity tokens issued by the configured provider.
///
/// Signing keys are fetched from the discovered `jwks_uri` and cached; an
/// unknown `kid` forces one refresh to pick up key rotation. Every failure
/// mode (bad signature, wrong issuer or audience, expired, unknown key)
/// collapses to `VerificationFailed` — callers never need finer granularity
/// and raw detail is only logged.
pub struct IdentityTokenVerifier {
    http: reqwest::Client,
    jwks_uri: String,
    issuer: String,
    audience: String,
    jwks_cache: Cache<String, JwkSet>,
}

impl IdentityTokenVerifier {
    /// Creates a verifier for the given JWKS endpoint, issuer, and audience.
    pub fn new(
        http: reqwest::Client,
        jwks_uri: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        jwks_ttl: Duration,
    ) -> Self {
        Self {
            http,
            jwks_uri: jwks_uri.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            jwks_cache: Cache::builder()
                .max_capacity(2)
                .time_to_live(jwks_ttl)
                .build(),
        }
    }

    /// Verifies signature, issuer, audience, and expiry; returns the claims.
    pub async fn verify(&self, raw_token: &str) -> AppResult<Claims> {
        let header = decode_header(raw_token).map_err(|e| {
            tracing::warn!(error = %e, "Failed to decode identity token header");
            AppError::verification_failed("Failed to decode identity token header")
        })?;

        let kid = header.kid.ok_or_else(|| {
            AppError::verification_failed("Identity token header carries no kid")
        })?;

        let jwk = self.find_key(&kid).await?;
        let (decoding_key, algorithm) = build_decoding_key(&jwk)?;

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = LEEWAY_SECS;

        let token_data = decode::<Claims>(raw_token, &decoding_key, &validation).map_err(|e| {
            tracing::warn!(error = %e, "Identity token validation failed");
            AppError::verification_failed("Signature or claims validation failed")
        })?;

        Ok(token_data.claims)
    }

    /// Looks up the signing key for `kid`, refreshing the cached JWKS once
    /// when the key is unknown (key rotation).
    async fn find_key(&self, kid: &str) -> AppResult<Jwk> {
        let jwks = match self.jwks_cache.get(&self.jwks_uri).await {
            Some(cached) => cached,
            None => {
                let fetched = self.fetch_jwks().await?;
                self.jwks_cache
                    .insert(self.jwks_uri.clone(), fetched.clone())
                    .await;
                fetched
            }
        };

        if let Some(key) = jwks.keys.iter().find(|k| k.kid.as_deref() == Some(kid)) {
            return Ok(key.clone());
        }

        tracing::info!(kid = %kid, "Signing key not in cached JWKS, refreshing");
        self.jwks_cache.invalidate(&self.jwks_uri).await;

        let refreshed = self.fetch_jwks().await?;
        let key = refreshed
            .keys
            .iter()
            .find(|k| k.kid.as_deref() == Some(kid))
            .cloned()
            .ok_or_else(|| {
                AppError::verification_failed(format!(
                    "No signing key found for kid '{kid}' after JWKS refresh"
                ))
            })?;
        self.jwks_cache
            .insert(self.jwks_uri.clone(), refreshed)
            .await;

        Ok(key)
    }

    /// Fetches the key set from the provider.
    async fn fetch_jwks(&self) -> AppResult<JwkSet> {
        let response = self.http.get(&self.jwks_uri).send().await.map_err(|e| {
            tracing::warn!(error = %e, "JWKS fetch failed");
            AppError::verification_failed("JWKS fetch failed")
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::verification_failed(format!(
                "JWKS endpoint returned HTTP {status}"
            )));
        }

        response.json::<JwkSet>().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse JWKS");
            AppError::verification_failed("Failed to parse JWKS")
        })
    }
}

impl std::fmt::Debug for IdentityTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityTokenVerifier")
            .field("jwks_uri", &self.jwks_uri)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

/// Builds a decoding key from an RSA JWK.
///
/// The algorithm is taken from the JWK, never from the token header, so a
/// token cannot pick its own verification algorithm.
fn build_decoding_key(jwk: &Jwk) -> AppResult<(DecodingKey, Algorithm)> {
    if jwk.kty != "RSA" {
        return Err(AppError::verification_failed(format!(
            "Unsupported JWK key type: {}",
            jwk.kty
        )));
    }

    let n = jwk
        .n
        .as_ref()
        .ok_or_else(|| AppError::verification_failed("RSA JWK missing 'n' component"))?;
    let e = jwk
        .e
        .as_ref()
        .ok_or_else(|| AppError::verification_failed("RSA JWK missing 'e' component"))?;

    let key = DecodingKey::from_rsa_components(n, e)
        .map_err(|e| AppError::verification_failed(format!("Invalid RSA components: {e}")))?;

    let alg = match jwk.alg.as_deref() {
        Some("RS384") => Algorithm::RS384,
        Some("RS512") => Algorithm::RS512,
        _ => Algorithm::RS256,
    };

    Ok((key, alg))
}
