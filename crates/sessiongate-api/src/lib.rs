//! # sessiongate-api
//!
//! The HTTP surface of SessionGate: the axum router, request handlers,
//! cookie-backed browser sessions, the SSE event stream, and the middleware
//! stack. All domain logic stays in `sessiongate-service`; this crate only
//! translates between HTTP and the orchestrator.

pub mod browser_session;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
