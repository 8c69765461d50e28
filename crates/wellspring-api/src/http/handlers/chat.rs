//! Chat HTTP handlers.
//!
//! Endpoints:
//! - POST /chat               - Run one chat exchange
//! - GET  /chat/{session_id}  - Read-only history replay

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use wellspring_types::chat::{ChatHistoryResponse, ChatRequest, ChatResponse};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /chat - Run one chat exchange and return the full transcript.
pub async fn create_chat_completion(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let response = state.chat_service.handle_chat(payload).await?;
    Ok(Json(response))
}

/// GET /chat/{session_id} - Replay the stored transcript for a session.
pub async fn get_chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ChatHistoryResponse>, AppError> {
    let response = state.chat_service.get_history(session_id).await?;
    Ok(Json(response))
}
