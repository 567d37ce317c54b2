//! Client side of the relay: the upstream generation API.
//!
//! - [`responses`]: reqwest implementation against a `/responses` endpoint
//! - [`extract`]: output normalization and error-body truncation
//!
//! A call never distinguishes a timeout by inspecting an error type. The
//! deadline is part of the operation and its expiry is one of the tagged
//! [`UpstreamOutcome`] variants.

pub mod extract;
pub mod responses;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use extract::{extract_output, truncate_chars};
pub use responses::ResponsesClient;

/// Body sent to the generation API.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
}

/// Result of one bounded upstream exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    /// 2xx with a JSON payload.
    Completed(Value),
    /// Non-2xx; `body` is already truncated.
    Rejected { status: u16, body: String },
    /// The deadline expired before the exchange finished.
    TimedOut(Duration),
}

/// Failures that are neither an upstream verdict nor a timeout.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(String),
}

impl UpstreamError {
    /// Short failure category reported to clients alongside the message.
    pub fn category(&self) -> &'static str {
        match self {
            UpstreamError::Network(_) => "NetworkError",
            UpstreamError::Decode(_) => "ParseError",
        }
    }
}

/// Something that turns a prompt into an upstream response.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, api_key: &str, prompt: &str)
        -> Result<UpstreamOutcome, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = UpstreamRequest {
            model: "gpt-4o-mini",
            input: "say hi",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"model": "gpt-4o-mini", "input": "say hi"}));
    }

    #[test]
    fn test_decode_category() {
        let err = UpstreamError::Decode("expected value at line 1".into());
        assert_eq!(err.category(), "ParseError");
        assert_eq!(err.to_string(), "expected value at line 1");
    }
}
