//! Shared fixtures for service-level tests.

mod helpers;

pub(crate) use helpers::*;
