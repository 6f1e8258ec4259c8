//! # sessiongate-realtime
//!
//! Shared mutable state of SessionGate:
//!
//! - [`SessionRegistry`] — concurrent user-id → session store
//! - [`EventHub`] — per-user broadcast over live streaming subscribers,
//!   with publish-timeout eviction of unresponsive consumers

pub mod hub;
pub mod registry;
pub mod subscriber;

pub use hub::EventHub;
pub use registry::SessionRegistry;
pub use subscriber::Subscriber;
