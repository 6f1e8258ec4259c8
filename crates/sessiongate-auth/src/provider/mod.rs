//! Identity-provider integration: discovery, client, token verification.

pub mod client;
pub mod discovery;
pub mod verifier;
