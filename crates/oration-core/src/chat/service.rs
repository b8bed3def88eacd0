//! Chat service orchestrating the send-message pipeline and session CRUD.
//!
//! `send_message` runs the stages in order: normalize the payload, resolve
//! (or create) the session, persist the user message, assemble the history,
//! obtain an assistant reply, persist the assistant message.

use oration_types::chat::{
    ChatMessage, ChatSession, DEFAULT_SESSION_TITLE, HistoryEntry, SendMessageOutput, SessionPage,
};
use oration_types::config::ProviderSettings;
use oration_types::error::{ChatError, RepositoryError};
use oration_types::llm::MessageRole;
use serde_json::Value;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::chat::normalize::normalize_payload;
use crate::chat::prompt::build_completion_request;
use crate::chat::reply::{AssistantReply, mock_reply};
use crate::chat::repository::ChatRepository;
use crate::chat::title::derive_title;
use crate::llm::connector::ProviderConnector;
use crate::llm::selector::{ProviderChoice, select_provider};

/// Default page size for session listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page size a caller may ask for.
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Number of characters of a reply shown in debug logs.
const REPLY_PREVIEW_CHARS: usize = 80;

/// Orchestrates chat sessions and the send-message pipeline.
///
/// Generic over `ChatRepository` and `ProviderConnector` so oration-core never
/// depends on oration-infra. Provider settings are read once at construction.
pub struct ChatService<C: ChatRepository, P: ProviderConnector> {
    chat_repo: C,
    connector: P,
    settings: ProviderSettings,
}

impl<C: ChatRepository, P: ProviderConnector> ChatService<C, P> {
    pub fn new(chat_repo: C, connector: P, settings: ProviderSettings) -> Self {
        Self {
            chat_repo,
            connector,
            settings,
        }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    /// Provider settings this service was built with.
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    // --- Send pipeline ---

    /// Accept a loosely-typed payload and return the persisted exchange.
    ///
    /// Invalid input fails before anything is written. Provider failures never
    /// fail the call: they become the assistant message text.
    #[tracing::instrument(skip(self, payload))]
    pub async fn send_message(&self, payload: &Value) -> Result<SendMessageOutput, ChatError> {
        let input = normalize_payload(payload)?;
        let session_id = self
            .resolve_session(input.session_id.as_deref(), &input.content)
            .await?;

        let user = ChatMessage::new(session_id, MessageRole::User, input.content.clone());
        self.chat_repo.save_message(&user).await?;

        let history = self.load_history(&session_id).await?;
        let reply = self.generate_reply(&history, &input.content).await;

        let assistant = ChatMessage::new(session_id, MessageRole::Assistant, reply.into_content());
        self.chat_repo.save_message(&assistant).await?;

        info!(session_id = %session_id, "chat exchange persisted");

        Ok(SendMessageOutput {
            session_id,
            user,
            assistant,
        })
    }

    /// Use the supplied session id, or create a session titled after `content`.
    ///
    /// A supplied id is not checked for existence here; appending to a missing
    /// session fails with `NotFound` at the first write. An id that is not a
    /// UUID cannot name a session and fails the same way, before any write.
    pub async fn resolve_session(
        &self,
        session_id: Option<&str>,
        content: &str,
    ) -> Result<Uuid, ChatError> {
        if let Some(raw) = session_id {
            return Uuid::parse_str(raw).map_err(|_| {
                debug!(session_id = raw, "session id is not a UUID");
                ChatError::Repository(RepositoryError::NotFound)
            });
        }

        let session = self
            .chat_repo
            .create_session(&ChatSession::new(derive_title(content)))
            .await?;
        info!(session_id = %session.id, title = %session.title, "session created");
        Ok(session.id)
    }

    /// The session's messages in chronological order as `{role, content}`.
    pub async fn load_history(&self, session_id: &Uuid) -> Result<Vec<HistoryEntry>, ChatError> {
        let messages = self.chat_repo.get_messages(session_id).await?;
        Ok(messages.iter().map(HistoryEntry::from).collect())
    }

    #[tracing::instrument(skip(self, history, submitted), fields(history_len = history.len()))]
    async fn generate_reply(&self, history: &[HistoryEntry], submitted: &str) -> AssistantReply {
        let choice = select_provider(&self.settings);
        debug!(%choice, "reply source selected");

        let kind = match choice {
            ProviderChoice::Mock(_) => return AssistantReply::Mock(mock_reply(history, submitted)),
            ProviderChoice::Live(kind) => kind,
        };

        let provider = match self.connector.connect(kind, &self.settings) {
            Ok(provider) => provider,
            Err(error) => {
                error!(provider = %kind, error = %error, "failed to build provider");
                return AssistantReply::Failed {
                    provider: kind,
                    error,
                };
            }
        };

        let request = build_completion_request(history);
        match provider.complete(&request).await {
            Ok(response) => {
                let preview: String = response.content.chars().take(REPLY_PREVIEW_CHARS).collect();
                debug!(provider = %kind, model = %response.model, %preview, "provider replied");
                AssistantReply::Generated {
                    provider: kind,
                    content: response.content,
                }
            }
            Err(error) => {
                error!(provider = %kind, error = %error, "provider call failed");
                AssistantReply::Failed {
                    provider: kind,
                    error,
                }
            }
        }
    }

    // --- Session CRUD ---

    /// Create an empty session. A supplied title must not be blank.
    pub async fn create_session(&self, title: Option<String>) -> Result<ChatSession, ChatError> {
        let title = match title {
            Some(title) if title.trim().is_empty() => {
                return Err(ChatError::InvalidInput("title must not be blank".into()));
            }
            Some(title) => title,
            None => DEFAULT_SESSION_TITLE.to_string(),
        };

        let session = self.chat_repo.create_session(&ChatSession::new(title)).await?;
        info!(session_id = %session.id, "session created");
        Ok(session)
    }

    /// Get a session by ID.
    pub async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, ChatError> {
        Ok(self.chat_repo.get_session(session_id).await?)
    }

    /// One page of sessions, newest first, starting at `cursor` (inclusive).
    pub async fn list_sessions(
        &self,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<SessionPage, ChatError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(ChatError::InvalidInput(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }

        let cursor = cursor
            .map(|raw| {
                Uuid::parse_str(raw)
                    .map_err(|_| ChatError::InvalidInput(format!("invalid cursor: {raw}")))
            })
            .transpose()?;

        let mut items = self
            .chat_repo
            .list_sessions(cursor.as_ref(), limit + 1)
            .await?;

        let next_cursor = if items.len() > limit as usize {
            items.pop().map(|extra| extra.id)
        } else {
            None
        };

        Ok(SessionPage { items, next_cursor })
    }

    /// Messages of a session, oldest first. An unknown session has no messages.
    pub async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self.chat_repo.get_messages(session_id).await?)
    }

    /// Delete a session and, through the cascade, all of its messages.
    pub async fn delete_session(&self, session_id: &Uuid) -> Result<(), ChatError> {
        self.chat_repo.delete_session(session_id).await?;
        info!(session_id = %session_id, "session deleted");
        Ok(())
    }
}
