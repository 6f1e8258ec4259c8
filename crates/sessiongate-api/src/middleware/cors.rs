//! CORS layer built from configuration.

use http::Method;
use tower_http::cors::{Any, CorsLayer};

use sessiongate_core::config::app::CorsConfig;

/// Build the CORS layer from configuration.
///
/// The browser frontend sends the session cookie cross-origin, so the
/// credentialed path requires an explicit origin list; a `"*"` origin list
/// falls back to credential-less wildcard CORS (development only).
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    let wildcard_origin = config.allowed_origins.contains(&"*".to_string());
    if wildcard_origin {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<http::HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<http::HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    if config.allow_credentials && !wildcard_origin {
        cors = cors.allow_credentials(true);
    }

    cors.max_age(std::time::Duration::from_secs(config.max_age_seconds))
}
