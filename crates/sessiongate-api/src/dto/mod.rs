//! Request/response wire types.

pub mod request;
pub mod response;
