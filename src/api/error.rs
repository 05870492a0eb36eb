//! HTTP mapping for pipeline errors

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::error;

use crate::api::types::ErrorResponse;
use crate::errors::AskRagError;

impl AskRagError {
    /// HTTP status for this error: validation failures are the caller's
    /// fault, everything else is ours.
    pub fn status(&self) -> StatusCode {
        match self {
            AskRagError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short caller-facing description of an internal failure. Full detail
    /// stays in the logs.
    fn details(&self) -> &'static str {
        match self {
            AskRagError::Embedding(_) => "embedding request failed",
            AskRagError::Generation(_) => "generation request failed",
            AskRagError::Http(_) => "upstream request failed",
            _ => "internal error",
        }
    }
}

impl IntoResponse for AskRagError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        let body = match &self {
            AskRagError::Validation(msg) => ErrorResponse {
                error: msg.clone(),
                details: None,
            },
            other => {
                error!("Request failed: {other}");
                ErrorResponse {
                    error: "Server error".to_string(),
                    details: Some(other.details().to_string()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
