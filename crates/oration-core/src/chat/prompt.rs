//! Assistant instruction and completion request assembly.

use oration_types::chat::HistoryEntry;
use oration_types::llm::{CompletionRequest, Message};

/// Fixed instruction sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful, professional career counsellor. Provide structured, actionable advice. Do not repeat or rephrase the user's message; respond with new guidance only.";

/// Sampling temperature used for every provider call.
pub const TEMPERATURE: f64 = 0.4;

/// Build the provider-agnostic request for a conversation.
///
/// The model is left empty so each provider falls back to its configured
/// default; adapters decide where the system instruction goes.
pub fn build_completion_request(history: &[HistoryEntry]) -> CompletionRequest {
    CompletionRequest {
        model: String::new(),
        system: Some(SYSTEM_PROMPT.to_string()),
        messages: history
            .iter()
            .map(|entry| Message {
                role: entry.role.clone(),
                content: entry.content.clone(),
            })
            .collect(),
        temperature: Some(TEMPERATURE),
    }
}
