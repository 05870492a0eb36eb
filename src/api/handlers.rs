//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::api::types::AskRequest;
use crate::api::types::AskResponse;
use crate::api::types::HealthResponse;
use crate::errors::AskRagError;
use crate::rag::RagService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rag_service: Arc<RagService>,
}

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Ask a question about the posted text (POST /ask)
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AskRagError> {
    info!(
        "POST /ask ({} text bytes, {} question bytes)",
        req.text.len(),
        req.question.len()
    );

    let answer = state.rag_service.answer(&req.text, &req.question).await?;

    Ok(Json(AskResponse { answer }))
}
