//! Handler-boundary errors and their JSON rendering.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Everything that can end a relay request without an output.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing prompt")]
    MissingPrompt,

    #[error("Server missing {0}")]
    MissingApiKey(String),

    /// Upstream answered with a non-success status; the body is passed through.
    #[error("{0}")]
    Upstream(String),

    #[error("AbortError: upstream did not respond within {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("{}: {}", .0.category(), .0)]
    Failed(#[from] UpstreamError),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingPrompt => StatusCode::BAD_REQUEST,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::MissingApiKey(_) | RelayError::Upstream(_) | RelayError::Failed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Attach the request identifier used for client/server correlation.
    pub fn for_request(self, request_id: &str) -> RequestFailure {
        RequestFailure {
            request_id: Some(request_id.to_string()),
            error: self,
        }
    }
}

/// Error payload: `{"error": "...", "requestId": "..."}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// A [`RelayError`] ready to be sent to the client.
#[derive(Debug)]
pub struct RequestFailure {
    pub request_id: Option<String>,
    pub error: RelayError,
}

impl From<RelayError> for RequestFailure {
    fn from(error: RelayError) -> Self {
        Self {
            request_id: None,
            error,
        }
    }
}

impl IntoResponse for RequestFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error.to_string(),
            request_id: self.request_id,
        };
        (self.error.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RelayError::MissingPrompt.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            RelayError::MissingApiKey("OPENAI_API_KEY".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Upstream("rate limited".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Timeout(Duration::from_secs(45)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            RelayError::Failed(UpstreamError::Decode("bad".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            RelayError::MissingApiKey("OPENAI_API_KEY".into()).to_string(),
            "Server missing OPENAI_API_KEY"
        );
        assert_eq!(
            RelayError::Timeout(Duration::from_secs(45)).to_string(),
            "AbortError: upstream did not respond within 45000ms"
        );
        assert_eq!(
            RelayError::Failed(UpstreamError::Decode("trailing characters".into())).to_string(),
            "ParseError: trailing characters"
        );
    }

    #[test]
    fn test_error_body_omits_missing_request_id() {
        let body = ErrorBody {
            error: "Method not allowed".into(),
            request_id: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Method not allowed"}"#
        );

        let body = ErrorBody {
            error: "Missing prompt".into(),
            request_id: Some("abc".into()),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Missing prompt","requestId":"abc"}"#
        );
    }
}
