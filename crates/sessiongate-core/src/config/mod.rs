//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod events;
pub mod logging;
pub mod provider;
pub mod session;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::events::EventsConfig;
use self::logging::LoggingConfig;
use self::provider::ProviderConfig;
use self::session::SessionCookieConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity provider settings.
    ///
    /// The only section without a full set of defaults: `client_secret`
    /// must be supplied, and the process refuses to start without it.
    pub provider: ProviderConfig,
    /// Event-hub and streaming settings.
    #[serde(default)]
    pub events: EventsConfig,
    /// Browser session cookie settings.
    #[serde(default)]
    pub session_cookie: SessionCookieConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `SESSIONGATE_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SESSIONGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
