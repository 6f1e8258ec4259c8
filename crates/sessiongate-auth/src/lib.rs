//! # sessiongate-auth
//!
//! Identity-provider integration for SessionGate:
//!
//! - OIDC discovery against the provider's well-known endpoint
//! - Authorization URL construction and authorization-code exchange
//! - Identity-token verification against the provider's published JWKS
//! - Anti-forgery state generation
//! - Backchannel logout-token parsing

pub mod logout_token;
pub mod provider;
pub mod state;

pub use logout_token::{LogoutClaims, LogoutTokenValidator};
pub use provider::client::IdentityProviderClient;
pub use provider::discovery::ProviderMetadata;
pub use provider::verifier::IdentityTokenVerifier;
