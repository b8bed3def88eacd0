//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `oration-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, writes on the writer
//! pool and reads on the reader pool.

use chrono::{DateTime, SecondsFormat, Utc};
use oration_core::chat::repository::ChatRepository;
use oration_types::chat::{ChatMessage, ChatSession};
use oration_types::error::RepositoryError;
use oration_types::llm::MessageRole;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
#[derive(Clone)]
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatSessionRow {
    id: String,
    title: String,
    created_at: String,
    updated_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))?;

        Ok(ChatSession {
            id,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct ChatMessageRow {
    id: String,
    session_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let session_id = Uuid::parse_str(&self.session_id)
            .map_err(|e| RepositoryError::Query(format!("invalid session_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            id,
            session_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC timestamps so string comparison in SQL is chronological.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn rows_to_sessions(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<ChatSession>, RepositoryError> {
    let mut sessions = Vec::with_capacity(rows.len());
    for row in rows {
        let session_row =
            ChatSessionRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        sessions.push(session_row.into_session()?);
    }
    Ok(sessions)
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO chat_sessions (id, title, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session.id.to_string())
        .bind(&session.title)
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(session.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("session '{}' already exists", session.id)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let session_row = ChatSessionRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn list_sessions(
        &self,
        cursor: Option<&Uuid>,
        limit: u32,
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        let rows = match cursor {
            None => {
                sqlx::query(
                    "SELECT * FROM chat_sessions ORDER BY created_at DESC, id DESC LIMIT ?",
                )
                .bind(i64::from(limit))
                .fetch_all(&self.pool.reader)
                .await
            }
            // Keyset page starting at the cursor row; an unknown cursor joins nothing.
            Some(cursor) => {
                sqlx::query(
                    r#"SELECT s.* FROM chat_sessions s
                       JOIN chat_sessions c ON c.id = ?
                       WHERE s.created_at < c.created_at
                          OR (s.created_at = c.created_at AND s.id <= c.id)
                       ORDER BY s.created_at DESC, s.id DESC
                       LIMIT ?"#,
                )
                .bind(cursor.to_string())
                .bind(i64::from(limit))
                .fetch_all(&self.pool.reader)
                .await
            }
        }
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_sessions(&rows)
    }

    async fn delete_session(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO chat_messages (id, session_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                return Err(RepositoryError::NotFound);
            }
            Err(e) => return Err(RepositoryError::Query(e.to_string())),
        }

        sqlx::query("UPDATE chat_sessions SET updated_at = ? WHERE id = ?")
            .bind(format_datetime(&message.created_at))
            .bind(message.session_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn session_at(title: &str, created_at: DateTime<Utc>) -> ChatSession {
        let mut session = ChatSession::new(title);
        session.created_at = created_at;
        session.updated_at = created_at;
        session
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let session = ChatSession::new("Career change");

        repo.create_session(&session).await.unwrap();
        let fetched = repo.get_session(&session.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, session.id);
        assert_eq!(fetched.title, "Career change");
        assert_eq!(
            format_datetime(&fetched.created_at),
            format_datetime(&session.created_at)
        );
    }

    #[tokio::test]
    async fn test_get_missing_session_is_none() {
        let repo = SqliteChatRepository::new(test_pool().await);
        assert!(repo.get_session(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_session_is_conflict() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let session = ChatSession::new("dup");

        repo.create_session(&session).await.unwrap();
        let err = repo.create_session(&session).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_messages_are_ordered_and_touch_session() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let base = Utc::now() - Duration::minutes(5);
        let session = session_at("s1", base);
        repo.create_session(&session).await.unwrap();

        let contents = ["I'm a teacher", "Great background", "Thanks"];
        let roles = [MessageRole::User, MessageRole::Assistant, MessageRole::User];
        // Insert out of order to prove the query sorts by created_at.
        for i in [2usize, 0, 1] {
            let mut message = ChatMessage::new(session.id, roles[i].clone(), contents[i]);
            message.created_at = base + Duration::seconds(i as i64 + 1);
            repo.save_message(&message).await.unwrap();
        }

        let messages = repo.get_messages(&session.id).await.unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, contents);
        assert_eq!(messages[1].role, MessageRole::Assistant);

        let touched = repo.get_session(&session.id).await.unwrap().unwrap();
        assert!(touched.updated_at > touched.created_at);
    }

    #[tokio::test]
    async fn test_message_for_missing_session_is_not_found() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let message = ChatMessage::new(Uuid::now_v7(), MessageRole::User, "orphan");

        let err = repo.save_message(&message).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_session_cascades_messages() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let session = ChatSession::new("to delete");
        repo.create_session(&session).await.unwrap();
        repo.save_message(&ChatMessage::new(session.id, MessageRole::User, "hi"))
            .await
            .unwrap();

        repo.delete_session(&session.id).await.unwrap();

        assert!(repo.get_session(&session.id).await.unwrap().is_none());
        assert!(repo.get_messages(&session.id).await.unwrap().is_empty());

        let err = repo.delete_session(&session.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_sessions_keyset_pages() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let base = Utc::now();
        let mut ids = Vec::new();
        for i in 0..5 {
            let session = session_at(&format!("session {i}"), base + Duration::seconds(i));
            repo.create_session(&session).await.unwrap();
            ids.push(session.id);
        }

        let first = repo.list_sessions(None, 3).await.unwrap();
        let titles: Vec<&str> = first.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["session 4", "session 3", "session 2"]);

        let page = repo.list_sessions(Some(&ids[2]), 3).await.unwrap();
        let page_ids: Vec<Uuid> = page.iter().map(|s| s.id).collect();
        assert_eq!(page_ids, vec![ids[2], ids[1], ids[0]]);

        let unknown = repo.list_sessions(Some(&Uuid::now_v7()), 3).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_list_sessions_breaks_ties_by_id() {
        let repo = SqliteChatRepository::new(test_pool().await);
        let at = Utc::now();
        let a = session_at("a", at);
        let b = session_at("b", at);
        repo.create_session(&a).await.unwrap();
        repo.create_session(&b).await.unwrap();

        let (newer, older) = if a.id > b.id { (a.id, b.id) } else { (b.id, a.id) };
        let listed: Vec<Uuid> = repo
            .list_sessions(None, 10)
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(listed, vec![newer, older]);

        let from_older: Vec<Uuid> = repo
            .list_sessions(Some(&older), 10)
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(from_older, vec![older]);
    }
}
