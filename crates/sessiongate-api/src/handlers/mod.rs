//! Request handlers, grouped by concern.

pub mod auth;
pub mod events;
pub mod health;
pub mod session;
