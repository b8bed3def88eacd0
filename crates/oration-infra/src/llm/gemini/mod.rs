//! Google Gemini provider implementation.
//!
//! [`GeminiProvider`] implements the
//! [`LlmProvider`](oration_core::llm::provider::LlmProvider) trait against the
//! native `generateContent` endpoint.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
