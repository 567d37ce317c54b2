//! Fixed cross-origin headers.
//!
//! Unlike a negotiating CORS layer, these headers are written on every
//! response whether or not the request carried an `Origin`, and preflight is
//! answered by the routes themselves with a bare 204.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::CorsConfig;

/// Precomputed header values for one route.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
    allow_headers: HeaderValue,
    allow_methods: HeaderValue,
    max_age: HeaderValue,
}

impl CorsHeaders {
    pub fn new(config: &CorsConfig, allow_methods: &str) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(&config.allow_origin)?,
            allow_headers: HeaderValue::from_str(&config.allow_headers)?,
            allow_methods: HeaderValue::from_str(allow_methods)?,
            max_age: HeaderValue::from(config.max_age_secs),
        })
    }

    pub fn apply(&self, response: &mut Response) {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
    }
}

/// Response-mapping middleware: stamps the route's CORS headers.
pub async fn with_cors(State(cors): State<Arc<CorsHeaders>>, mut response: Response) -> Response {
    cors.apply(&mut response);
    response
}

/// Preflight answer: empty 204. Headers come from [`with_cors`].
pub async fn preflight() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_applied() {
        let cors = CorsHeaders::new(&CorsConfig::default(), "POST, OPTIONS").unwrap();
        let mut response = StatusCode::NO_CONTENT.into_response();
        cors.apply(&mut response);

        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Authorization");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "86400");
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let config = CorsConfig {
            allow_origin: "bad\nvalue".to_string(),
            ..CorsConfig::default()
        };
        assert!(CorsHeaders::new(&config, "POST").is_err());
    }
}
