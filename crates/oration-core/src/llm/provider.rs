//! LlmProvider trait definition.
//!
//! This is the core abstraction that the Gemini and OpenAI adapters implement.
//! Uses RPITIT for `complete`; see [`super::box_provider`] for dynamic dispatch.

use oration_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (Gemini, OpenAI).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in oration-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    ///
    /// Any transport, status or decoding failure is reported as an
    /// [`LlmError`]; an empty generation is a successful empty response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
