//! Identity provider
//!
//! Mock authentication: customer accounts and a separate chef identity,
//! persisted through the key-value adapter, plus the session-lifecycle
//! publisher the order state machine subscribes to.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::AuthError;
pub use service::*;
