//! Runtime configuration for prompt-relay.
//!
//! Configuration can be loaded from a JSON file or constructed programmatically.
//! The upstream credential is not part of the file: it is described by an
//! [`ApiKeySource`] and resolved on every request.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "prompt-relay", about = "Relay prompts to an LLM generation API")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address (overrides `server.listen`).
    #[arg(long)]
    pub listen: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Upstream generation API.
    pub upstream: UpstreamConfig,

    /// Cross-origin headers attached to every response.
    pub cors: CorsConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8080").
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream generation API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the API; the relay posts to `{base_url}/responses`.
    pub base_url: String,

    /// Model identifier sent with every request.
    pub model: String,

    /// Deadline for the whole upstream exchange, in milliseconds.
    pub timeout_ms: u64,

    /// Maximum number of characters of an upstream error body passed to the client.
    pub error_body_limit: usize,

    /// Environment variable holding the API credential.
    pub api_key_env: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 45_000,
            error_body_limit: 2000,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Full URL of the generation endpoint.
    pub fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Cross-origin settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value of `Access-Control-Allow-Origin`.
    pub allow_origin: String,

    /// Value of `Access-Control-Allow-Headers`.
    pub allow_headers: String,

    /// Value of `Access-Control-Max-Age`, in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_headers: "Content-Type, Authorization".to_string(),
            max_age_secs: 86_400,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}

/// Where the upstream API credential comes from.
///
/// `Env` is looked up on every [`resolve`](Self::resolve) call, so a process
/// started without the variable still answers preflight and health requests,
/// and picks the key up once it is set.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    /// Read the named environment variable at request time.
    Env(String),
    /// A value supplied by the embedder.
    Fixed(Option<String>),
}

impl ApiKeySource {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        ApiKeySource::Env(config.api_key_env.clone())
    }

    /// Current credential, or `None` if it is unset or empty.
    pub fn resolve(&self) -> Option<String> {
        let key = match self {
            ApiKeySource::Env(var) => std::env::var(var).ok(),
            ApiKeySource::Fixed(key) => key.clone(),
        };
        key.filter(|k| !k.is_empty())
    }

    /// Name reported to clients when the credential is missing.
    pub fn describe(&self) -> &str {
        match self {
            ApiKeySource::Env(var) => var,
            ApiKeySource::Fixed(_) => "API key",
        }
    }
}
