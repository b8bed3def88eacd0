//! Send-message handler.
//!
//! Endpoint:
//! - POST /api/v1/chat/send - Run one turn of the chat pipeline
//!
//! The body is deliberately loosely typed: callers send a bare object, a
//! one-element array, a `{input|json|0: ...}` wrapper or a JSON-encoded
//! string. Shape handling lives in the core normalizer, so the handler only
//! parses bytes into a `serde_json::Value`.

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use uuid::Uuid;

use oration_types::chat::SendMessageOutput;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/chat/send
pub async fn send_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<SendMessageOutput>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("request body is not valid JSON: {e}")))?;

    let output = state.chat_service.send_message(&payload).await?;

    tracing::info!(
        %request_id,
        session_id = %output.session_id,
        "chat turn completed"
    );

    let elapsed = start.elapsed().as_millis() as u64;
    let messages_link = format!("/api/v1/sessions/{}/messages", output.session_id);
    Ok(Json(
        ApiResponse::success(output, request_id, elapsed)
            .with_link("self", "/api/v1/chat/send")
            .with_link("messages", &messages_link),
    ))
}
