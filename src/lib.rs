//! prompt-relay: a single-endpoint LLM prompt relay.
//!
//! Accepts `{prompt}` over HTTP, forwards it to a `/responses`-style
//! generation API under a fixed deadline and returns the normalized text.
//! Every response carries permissive cross-origin headers so browsers can
//! call the relay directly.

pub mod config;
pub mod server;
pub mod upstream;
