//! OpenAiProvider -- [`LlmProvider`] for OpenAI chat completions.
//!
//! `async-openai` supplies the wire types and the endpoint/auth configuration.
//! The request goes out exactly once over a plain `reqwest` client, so the
//! first upstream status is what gets mapped. (`async_openai::Client` retries
//! 429 and 5xx on its own and drops the status of non-JSON error bodies.)

use std::time::Duration;

use async_openai::config::{Config, OpenAIConfig};
use async_openai::error::{ApiError, WrappedError};
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    CreateChatCompletionResponse,
};
use secrecy::{ExposeSecret, SecretString};

use oration_core::llm::provider::LlmProvider;
use oration_types::config::DEFAULT_OPENAI_BASE_URL;
use oration_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole};

/// OpenAI chat-completions provider.
///
/// Does NOT derive Debug: the `OpenAIConfig` holds the API key.
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAIConfig,
    model: String,
}

impl OpenAiProvider {
    /// Create a provider against the public OpenAI endpoint.
    pub fn new(api_key: &SecretString, model: String, timeout: Duration) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, model, timeout, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a provider against an explicit API base (e.g. a proxy).
    pub fn with_base_url(
        api_key: &SecretString,
        model: String,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        let config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            config,
            model,
        })
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let system = request.system.iter().map(|text| system_message(text));
        let history = request.messages.iter().map(|msg| match msg.role {
            MessageRole::System => system_message(&msg.content),
            MessageRole::User => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            MessageRole::Assistant => {
                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    )),
                    refusal: None,
                    name: None,
                    audio: None,
                    tool_calls: None,
                    function_call: None,
                })
            }
        });

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages: system.chain(history).collect(),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

fn system_message(text: &str) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
        content: ChatCompletionRequestSystemMessageContent::Text(text.to_string()),
        name: None,
    })
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    #[tracing::instrument(skip_all, fields(provider = "openai", model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(self.config.url("/chat/completions"))
            .query(&self.config.query())
            .headers(self.config.headers())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(map_error_response(status.as_u16(), &bytes));
        }

        let response: CreateChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: response.model,
        })
    }
}

fn transport_error(err: reqwest::Error) -> LlmError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.without_url().to_string()
    };
    LlmError::Provider {
        message: format!("HTTP request failed: {reason}"),
    }
}

/// Map a non-success response to an [`LlmError`].
///
/// The `{"error": {...}}` object decides when it is present and recognized;
/// otherwise the status does, so a plain-text 429 is still a rate limit.
fn map_error_response(status: u16, body: &[u8]) -> LlmError {
    if let Ok(wrapped) = serde_json::from_slice::<WrappedError>(body) {
        if let Some(err) = map_api_error(&wrapped.error) {
            return err;
        }
    }

    match status {
        401 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        _ => LlmError::Http {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        },
    }
}

/// Classify an OpenAI error object by its `code` / `type`.
///
/// `insufficient_quota` is checked before the generic rate-limit codes because
/// OpenAI reports both with HTTP 429.
fn map_api_error(api_err: &ApiError) -> Option<LlmError> {
    let code = api_err.code.as_deref().unwrap_or("");
    let error_type = api_err.r#type.as_deref().unwrap_or("");

    if code == "insufficient_quota" || error_type == "insufficient_quota" {
        Some(LlmError::QuotaExceeded(api_err.message.clone()))
    } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
        Some(LlmError::RateLimited {
            retry_after_ms: None,
        })
    } else if code == "invalid_api_key"
        || error_type == "authentication_error"
        || api_err.message.contains("Incorrect API key")
    {
        Some(LlmError::AuthenticationFailed)
    } else {
        None
    }
}
