//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends non-streaming requests to `{base}/v1/models/{model}:generateContent`.
//! The API key travels as the `key` query parameter and is stripped from any
//! error text before it is logged.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use oration_core::llm::provider::LlmProvider;
use oration_types::config::DEFAULT_GEMINI_BASE_URL;
use oration_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole};

use super::types::{
    GeminiContent, GeminiPart, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};

/// Google Gemini LLM provider.
///
/// Does not derive Debug so the key can never end up in a log line.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with a per-request timeout.
    pub fn new(api_key: &SecretString, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: SecretString::from(api_key.expose_secret().to_string()),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1/models/{model}:generateContent", self.base_url)
    }

    /// Convert a generic [`CompletionRequest`] into a `generateContent` body.
    ///
    /// Gemini has no system role here, so the instruction goes first as a
    /// `user` turn. Assistant turns become `model`, everything else `user`.
    fn to_gemini_request(request: &CompletionRequest) -> GenerateContentRequest {
        let system = request.system.iter().map(|text| turn("user", text));
        let history = request.messages.iter().map(|m| {
            let role = match m.role {
                MessageRole::Assistant => "model",
                MessageRole::User | MessageRole::System => "user",
            };
            turn(role, &m.content)
        });

        GenerateContentRequest {
            contents: system.chain(history).collect(),
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

fn turn(role: &str, text: &str) -> GeminiContent {
    GeminiContent {
        role: role.to_string(),
        parts: vec![GeminiPart {
            text: Some(text.to_string()),
        }],
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[tracing::instrument(skip_all, fields(provider = "gemini", model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let body = Self::to_gemini_request(request);

        let response = self
            .client
            .post(self.url(model))
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.without_url().to_string()
                };
                LlmError::Provider {
                    message: format!("HTTP request failed: {reason}"),
                }
            })?;

        // A 429 stays an Http error so the body survives; `is_quota` covers it.
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(LlmError::Http {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {}", e.without_url()))
        })?;

        Ok(CompletionResponse {
            content: gemini_resp.text(),
            model: gemini_resp
                .model_version
                .unwrap_or_else(|| model.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oration_types::llm::Message;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new(
            &SecretString::from("gm-test-key".to_string()),
            "gemini-1.5-flash".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(server.uri())
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            system: Some("Be a career counsellor.".to_string()),
            messages: vec![
                Message {
                    role: MessageRole::User,
                    content: "I'm a teacher".to_string(),
                },
                Message {
                    role: MessageRole::Assistant,
                    content: "Great background".to_string(),
                },
                Message {
                    role: MessageRole::User,
                    content: "Thanks".to_string(),
                },
            ],
            temperature: Some(0.4),
        }
    }

    #[test]
    fn test_to_gemini_request_maps_roles() {
        let body = GeminiProvider::to_gemini_request(&request());
        let roles: Vec<&str> = body.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "user", "model", "user"]);
        assert_eq!(
            body.contents[0].parts[0].text.as_deref(),
            Some("Be a career counsellor.")
        );
        assert_eq!(body.generation_config.temperature, Some(0.4));
    }

    #[tokio::test]
    async fn test_complete_returns_joined_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "gm-test-key"))
            .and(body_partial_json(json!({"generationConfig": {"temperature": 0.4}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "Try tutoring."}, {"text": "Then consulting."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server).complete(&request()).await.unwrap();
        assert_eq!(response.content, "Try tutoring.\nThen consulting.");
        assert_eq!(response.model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_complete_without_text_is_empty_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let response = provider(&server).complete(&request()).await.unwrap();
        assert_eq!(response.content, "");
    }

    #[tokio::test]
    async fn test_complete_429_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        assert!(err.is_quota());
        match err {
            LlmError::Http { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("RESOURCE_EXHAUSTED"));
            }
            other => panic!("expected Http error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_complete_other_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        match err {
            LlmError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Http error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_complete_bad_body_is_deserialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
        assert!(!err.to_string().contains("gm-test-key"));
    }

    #[tokio::test]
    async fn test_complete_timeout_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(
            &SecretString::from("gm-test-key".to_string()),
            "gemini-1.5-flash".to_string(),
            Duration::from_millis(200),
        )
        .unwrap()
        .with_base_url(server.uri());

        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
        assert!(!err.is_quota());
        assert!(!err.to_string().contains("gm-test-key"));
    }
}
