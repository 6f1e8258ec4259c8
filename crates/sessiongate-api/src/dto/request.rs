//! Inbound request types.

use serde::Deserialize;

/// Query parameters of the provider callback redirect.
///
/// Both fields stay optional at the wire level; the orchestrator owns the
/// decision of which absence maps to which error.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange.
    pub code: Option<String>,
    /// Anti-forgery state echoed by the provider.
    pub state: Option<String>,
}

/// Form body of a provider backchannel-logout request.
#[derive(Debug, Deserialize)]
pub struct BackchannelLogoutForm {
    /// Compact-JWT logout token.
    pub logout_token: Option<String>,
}
