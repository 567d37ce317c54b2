//! Relay HTTP API.
//!
//! - POST /generate: forward `{prompt}` upstream, answer `{output, requestId}`
//! - GET /generate: usage hint
//! - any method /ping: liveness
//! - OPTIONS on both: preflight

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::middleware::map_response_with_state;
use axum::routing::{any, get, MethodRouter};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{ApiKeySource, Config};
use crate::server::cors::{preflight, with_cors, CorsHeaders};
use crate::server::error::{RelayError, RequestFailure};
use crate::upstream::{extract_output, Generator, ResponsesClient, UpstreamOutcome};

/// Application state shared across handlers.
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<dyn Generator>,
    pub api_key: ApiKeySource,
}

impl AppState {
    /// State backed by the reqwest client and an environment-held credential.
    pub fn from_config(config: Arc<Config>) -> Result<Self, reqwest::Error> {
        let generator = ResponsesClient::new(&config.upstream)?;
        let api_key = ApiKeySource::from_config(&config.upstream);
        Ok(Self {
            config,
            generator: Arc::new(generator),
            api_key,
        })
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let generate_cors = Arc::new(CorsHeaders::new(&state.config.cors, "POST, OPTIONS")?);
    let ping_cors = Arc::new(CorsHeaders::new(&state.config.cors, "GET, POST, OPTIONS")?);

    // HEAD is registered explicitly so it does not fall through to the GET hint.
    let generate_route: MethodRouter<Arc<AppState>> = get(generate_hint)
        .head(method_not_allowed)
        .post(generate)
        .options(preflight)
        .fallback(method_not_allowed)
        .layer(map_response_with_state(generate_cors, with_cors));

    let ping_route: MethodRouter<Arc<AppState>> = any(ping)
        .options(preflight)
        .layer(map_response_with_state(ping_cors, with_cors));

    Ok(Router::new()
        .route("/generate", generate_route)
        .route("/ping", ping_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

// ─── Request/Response Types ────────────────────────────────────────────────

/// Inbound relay request. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Successful relay response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub output: String,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub ok: bool,
    pub hint: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub ok: bool,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn generate(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GenerateResponse>, RequestFailure> {
    let request_id = Uuid::new_v4().to_string();
    let started = Instant::now();

    // Unreadable or unparseable bodies are treated as `{}`.
    let req: GenerateRequest = match body {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
        Err(rejection) => {
            warn!(request_id = %request_id, error = %rejection, "Request body could not be read");
            GenerateRequest::default()
        }
    };
    let prompt = match req.prompt {
        Some(p) if !p.is_empty() => p,
        _ => return Err(RelayError::MissingPrompt.for_request(&request_id)),
    };

    let Some(api_key) = state.api_key.resolve() else {
        warn!(request_id = %request_id, "Upstream credential is not configured");
        return Err(RelayError::MissingApiKey(state.api_key.describe().to_string())
            .for_request(&request_id));
    };

    info!(request_id = %request_id, prompt_len = prompt.len(), "Relaying prompt");

    let outcome = state
        .generator
        .generate(&api_key, &prompt)
        .await
        .map_err(|e| {
            warn!(request_id = %request_id, error = %e, "Upstream call failed");
            RelayError::from(e).for_request(&request_id)
        })?;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match outcome {
        UpstreamOutcome::Completed(payload) => {
            let output = extract_output(&payload);
            info!(request_id = %request_id, elapsed_ms, output_len = output.len(), "Relay complete");
            Ok(Json(GenerateResponse { output, request_id }))
        }
        UpstreamOutcome::Rejected { status, body } => {
            warn!(request_id = %request_id, status, elapsed_ms, "Upstream rejected request");
            Err(RelayError::Upstream(body).for_request(&request_id))
        }
        UpstreamOutcome::TimedOut(after) => {
            warn!(request_id = %request_id, elapsed_ms, "Upstream timed out");
            Err(RelayError::Timeout(after).for_request(&request_id))
        }
    }
}

async fn generate_hint() -> Json<HintResponse> {
    Json(HintResponse {
        ok: true,
        hint: "Use POST with { prompt }",
    })
}

async fn method_not_allowed() -> RequestFailure {
    RelayError::MethodNotAllowed.into()
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse { ok: true })
}
