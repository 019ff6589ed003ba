//! Error types for the gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Gateway Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The bucket's call budget is spent for the current window
    #[error("Rate limit reached, retry in {seconds_remaining}s")]
    QuotaExceeded { seconds_remaining: u64 },

    /// The upstream fetcher failed or returned an error
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// Missing or malformed startup configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::QuotaExceeded { seconds_remaining } => {
                let body = Json(json!({
                    "error": "Rate limit reached. Please try again later.",
                    "retry_after": seconds_remaining,
                }));
                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(seconds_remaining));
                response
            }
            // Upstream and configuration details stay in the logs
            GatewayError::UpstreamFailure(_) | GatewayError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch data" })),
            )
                .into_response(),
            GatewayError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;
