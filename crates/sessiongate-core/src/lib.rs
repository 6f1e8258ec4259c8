//! # sessiongate-core
//!
//! Core crate for SessionGate. Contains configuration schemas, shared domain
//! types (sessions, profiles), and the unified error system.
//!
//! This crate has **no** internal dependencies on other SessionGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
