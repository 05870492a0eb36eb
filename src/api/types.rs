//! API request and response types

use serde::Deserialize;
use serde::Serialize;

/// Ask request: the raw document text and the question about it
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub question: String,
}

/// Ask response
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Error response body
///
/// Validation failures carry only `error`; internal failures add a short
/// generic `details` message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
