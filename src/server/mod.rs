//! HTTP surface of the relay.
//!
//! - [`relay_api`]: routes, handlers and shared state
//! - [`cors`]: fixed cross-origin headers and preflight
//! - [`error`]: handler-boundary error taxonomy

pub mod cors;
pub mod error;
pub mod relay_api;
