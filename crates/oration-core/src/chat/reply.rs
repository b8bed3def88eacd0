//! Assistant reply outcomes and the user-facing texts they turn into.
//!
//! Every send-message call ends with exactly one assistant message, whatever
//! the provider did. [`AssistantReply`] keeps the outcome typed until the
//! moment it is persisted.

use oration_types::chat::HistoryEntry;
use oration_types::llm::{LlmError, MessageRole, ProviderKind};

/// Persisted when the provider refused for rate or quota reasons.
pub const QUOTA_EXCEEDED_REPLY: &str =
    "The AI service quota was exceeded. Please check billing or try again later.";

/// Persisted for every other provider failure.
pub const GENERIC_FAILURE_REPLY: &str =
    "Sorry, I couldn't generate a response right now. Please try again in a moment.";

/// Outcome of the provider stage of the pipeline.
#[derive(Debug)]
pub enum AssistantReply {
    /// Placeholder produced without any network call.
    Mock(String),
    /// Text generated by a live provider (possibly empty).
    Generated { provider: ProviderKind, content: String },
    /// The live provider failed; the error is kept for logging.
    Failed { provider: ProviderKind, error: LlmError },
}

impl AssistantReply {
    /// The text to store as the assistant message.
    pub fn into_content(self) -> String {
        match self {
            AssistantReply::Mock(content) => content,
            AssistantReply::Generated { content, .. } => content,
            AssistantReply::Failed { error, .. } if error.is_quota() => {
                QUOTA_EXCEEDED_REPLY.to_string()
            }
            AssistantReply::Failed { .. } => GENERIC_FAILURE_REPLY.to_string(),
        }
    }
}

/// Placeholder reply used when AI is disabled or unconfigured.
///
/// Quotes the latest user message in `history`, or `fallback` if the history
/// holds no user message.
pub fn mock_reply(history: &[HistoryEntry], fallback: &str) -> String {
    let last_user = history
        .iter()
        .rev()
        .find(|entry| entry.role == MessageRole::User)
        .map(|entry| entry.content.as_str())
        .unwrap_or(fallback);

    format!(
        "Mock response (no AI available). Your message: \"{last_user}\"\n\n\
         - This is a local placeholder while AI is disabled or quota is exceeded.\n\
         - Add or fix OPENAI_API_KEY and remove OPENAI_USE_MOCK to get real answers."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: MessageRole, content: &str) -> HistoryEntry {
        HistoryEntry {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_mock_reply_quotes_latest_user_message() {
        let history = vec![
            entry(MessageRole::User, "first"),
            entry(MessageRole::Assistant, "answer"),
            entry(MessageRole::User, "second"),
        ];
        let reply = mock_reply(&history, "unused");
        assert!(reply.starts_with("Mock response (no AI available). Your message: \"second\""));
        assert!(reply.contains("\n\n- This is a local placeholder"));
        assert!(reply.ends_with("remove OPENAI_USE_MOCK to get real answers."));
    }

    #[test]
    fn test_mock_reply_falls_back_without_user_messages() {
        let history = vec![entry(MessageRole::Assistant, "hello")];
        let reply = mock_reply(&history, "typed text");
        assert!(reply.contains("\"typed text\""));
    }

    #[test]
    fn test_generated_content_passes_through() {
        let reply = AssistantReply::Generated {
            provider: ProviderKind::Gemini,
            content: String::new(),
        };
        assert_eq!(reply.into_content(), "");
    }

    #[test]
    fn test_quota_failures_get_quota_text() {
        let errors = [
            LlmError::RateLimited { retry_after_ms: None },
            LlmError::QuotaExceeded("insufficient_quota".into()),
            LlmError::Http {
                status: 429,
                body: "RESOURCE_EXHAUSTED".into(),
            },
        ];
        for error in errors {
            let reply = AssistantReply::Failed {
                provider: ProviderKind::OpenAi,
                error,
            };
            assert_eq!(reply.into_content(), QUOTA_EXCEEDED_REPLY);
        }
    }

    #[test]
    fn test_other_failures_get_generic_text() {
        let reply = AssistantReply::Failed {
            provider: ProviderKind::Gemini,
            error: LlmError::Http {
                status: 500,
                body: "internal".into(),
            },
        };
        assert_eq!(reply.into_content(), GENERIC_FAILURE_REPLY);
    }
}
