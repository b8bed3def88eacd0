//! Chat session and message types for Oration.
//!
//! These types model conversations between a user and the career assistant:
//! sessions, the append-only message log, and the shapes that flow in and out
//! of the send-message pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Title given to sessions created without one.
pub const DEFAULT_SESSION_TITLE: &str = "New session";

/// A persisted chat session.
///
/// Sessions are never mutated after creation except for the `updated_at`
/// touch on message activity. Deleting a session deletes its messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Build a fresh session with a new time-sortable id.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single message within a chat session.
///
/// Messages are immutable once written and ordered by `created_at`
/// ascending within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a new message stamped with the current time.
    pub fn new(session_id: Uuid, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Read-only `{role, content}` projection of a message, used for prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

impl From<&ChatMessage> for HistoryEntry {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.clone(),
            content: message.content.clone(),
        }
    }
}

/// One page of sessions, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPage {
    pub items: Vec<ChatSession>,
    /// Id of the first session of the next page, if there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Uuid>,
}

/// Canonical send-message input after payload normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageInput {
    pub session_id: Option<String>,
    pub content: String,
}

/// Result of a send-message call: the resolved session and both new records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageOutput {
    pub session_id: Uuid,
    pub user: ChatMessage,
    pub assistant: ChatMessage,
}
