//! reqwest client for a `/responses`-style generation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{truncate_chars, Generator, UpstreamError, UpstreamOutcome, UpstreamRequest};
use crate::config::UpstreamConfig;

/// Generation client bound to one endpoint and model.
pub struct ResponsesClient {
    client: Client,
    url: String,
    model: String,
    timeout: Duration,
    error_body_limit: usize,
}

impl ResponsesClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        // The deadline is enforced per exchange in `generate`, not on the client.
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            url: config.responses_url(),
            model: config.model.clone(),
            timeout: config.timeout(),
            error_body_limit: config.error_body_limit,
        })
    }

    /// One unbounded request/response exchange.
    async fn exchange(&self, api_key: &str, prompt: &str) -> Result<UpstreamOutcome, UpstreamError> {
        let body = UpstreamRequest {
            model: &self.model,
            input: prompt,
        };

        debug!(url = %self.url, model = %self.model, prompt_len = prompt.len(), "Sending upstream request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Ok(UpstreamOutcome::Rejected {
                status: status.as_u16(),
                body: truncate_chars(&text, self.error_body_limit).to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::Decode(format!("invalid upstream JSON: {e}")))?;

        Ok(UpstreamOutcome::Completed(payload))
    }
}

#[async_trait]
impl Generator for ResponsesClient {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<UpstreamOutcome, UpstreamError> {
        // Dropping the exchange future on expiry aborts the in-flight request.
        match tokio::time::timeout(self.timeout, self.exchange(api_key, prompt)).await {
            Ok(result) => result,
            Err(_) => Ok(UpstreamOutcome::TimedOut(self.timeout)),
        }
    }
}
