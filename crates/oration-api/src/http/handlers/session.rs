//! Session CRUD HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/sessions               - List sessions, newest first
//! - POST   /api/v1/sessions               - Create an empty session
//! - GET    /api/v1/sessions/{id}/messages - Get messages for a session
//! - DELETE /api/v1/sessions/{id}          - Delete a session and its messages

use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use oration_types::chat::{ChatMessage, ChatSession, SessionPage};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for session listing.
#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Request body for creating a session.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub title: Option<String>,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// Link to the page starting at `cursor`, keeping the caller's page size.
fn next_page_link(cursor: Uuid, limit: Option<u32>) -> String {
    match limit {
        Some(limit) => format!("/api/v1/sessions?cursor={cursor}&limit={limit}"),
        None => format!("/api/v1/sessions?cursor={cursor}"),
    }
}

/// GET /api/v1/sessions - List sessions with keyset pagination.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<ApiResponse<SessionPage>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let page = state
        .chat_service
        .list_sessions(query.cursor.as_deref(), query.limit)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let mut response =
        ApiResponse::success(page, request_id, elapsed).with_link("self", "/api/v1/sessions");
    if let Some(cursor) = response.data.as_ref().and_then(|p| p.next_cursor) {
        response = response.with_link("next", &next_page_link(cursor, query.limit));
    }
    Ok(Json(response))
}

/// POST /api/v1/sessions - Create a session. The body is optional.
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<ChatSession>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let request: CreateSessionRequest = if body.is_empty() {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("invalid request body: {e}")))?
    };

    let session = state.chat_service.create_session(request.title).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let messages_link = format!("/api/v1/sessions/{}/messages", session.id);
    Ok(Json(
        ApiResponse::success(session, request_id, elapsed).with_link("messages", &messages_link),
    ))
}

/// GET /api/v1/sessions/{id}/messages - Messages in chronological order.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    let messages = state.chat_service.get_messages(&session_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(messages, request_id, elapsed)
            .with_link("self", &format!("/api/v1/sessions/{session_id}/messages")),
    ))
}

/// DELETE /api/v1/sessions/{id} - Delete a session (messages cascade).
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    state.chat_service.delete_session(&session_id).await?;

    tracing::info!(%session_id, "session deleted");

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
        request_id,
        elapsed,
    )))
}
