//! ChatRepository trait definition.
//!
//! Provides CRUD operations for chat sessions and their append-only message log.

use oration_types::chat::{ChatMessage, ChatSession};
use oration_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat session and message persistence.
///
/// Implementations live in oration-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Create a new chat session.
    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Get a chat session by its unique ID.
    fn get_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// List sessions newest first (created_at DESC, id DESC).
    ///
    /// When `cursor` is set the listing starts at that session, inclusive.
    /// An unknown cursor yields an empty list. At most `limit` rows are returned.
    fn list_sessions(
        &self,
        cursor: Option<&Uuid>,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;

    /// Delete a chat session and its messages.
    ///
    /// Returns `RepositoryError::NotFound` if the session does not exist.
    fn delete_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message to its session and touch the session's `updated_at`.
    ///
    /// Returns `RepositoryError::NotFound` if the session does not exist.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get all messages for a session, ordered by created_at ASC.
    fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}
