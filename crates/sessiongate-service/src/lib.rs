//! # sessiongate-service
//!
//! The login state machine: [`AuthOrchestrator`] drives a browser from the
//! first redirect through callback verification into an active session, and
//! back out again through voluntary or provider-initiated logout. Profile
//! resolution from identity claims lives in [`profile`].

pub mod orchestrator;
pub mod profile;

pub use orchestrator::{AuthOrchestrator, LoginRedirect};
