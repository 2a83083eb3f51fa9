//! Chef order board
//!
//! The cross-user log of confirmed orders the kitchen works from. Each
//! order is its own versioned record, so two chef sessions editing at the
//! same time conflict instead of silently overwriting each other.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::BoardServiceError;
pub use service::*;
