//! LLM provider implementations.
//!
//! Concrete [`LlmProvider`](oration_core::llm::provider::LlmProvider)
//! implementations for the two supported backends, plus
//! [`HttpProviderConnector`], which builds the right one for a
//! [`ProviderKind`] from the startup [`ProviderSettings`].

pub mod gemini;
pub mod openai;

use std::time::Duration;

use oration_core::llm::box_provider::BoxLlmProvider;
use oration_core::llm::connector::ProviderConnector;
use oration_types::config::ProviderSettings;
use oration_types::llm::{LlmError, ProviderKind};

use self::gemini::GeminiProvider;
use self::openai::OpenAiProvider;

/// Builds HTTP-backed providers for the chat service.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpProviderConnector;

impl HttpProviderConnector {
    pub fn new() -> Self {
        Self
    }
}

impl ProviderConnector for HttpProviderConnector {
    fn connect(
        &self,
        kind: ProviderKind,
        settings: &ProviderSettings,
    ) -> Result<BoxLlmProvider, LlmError> {
        let timeout = Duration::from_secs(settings.request_timeout_secs);

        match kind {
            ProviderKind::Gemini => {
                let key = settings
                    .gemini_api_key
                    .as_ref()
                    .ok_or(LlmError::AuthenticationFailed)?;
                let provider = GeminiProvider::new(key, settings.gemini_model.clone(), timeout)?
                    .with_base_url(settings.gemini_base_url.as_str());
                Ok(BoxLlmProvider::new(provider))
            }
            ProviderKind::OpenAi => {
                let key = settings
                    .openai_api_key
                    .as_ref()
                    .ok_or(LlmError::AuthenticationFailed)?;
                let provider = OpenAiProvider::with_base_url(
                    key,
                    settings.openai_model.clone(),
                    timeout,
                    &settings.openai_base_url,
                )?;
                Ok(BoxLlmProvider::new(provider))
            }
        }
    }
}
