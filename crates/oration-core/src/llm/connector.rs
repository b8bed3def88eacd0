//! ProviderConnector trait definition.
//!
//! The chat service decides *which* provider to use; a connector knows *how*
//! to build it. The HTTP-backed implementation lives in oration-infra.

use oration_types::config::ProviderSettings;
use oration_types::llm::{LlmError, ProviderKind};

use super::box_provider::BoxLlmProvider;

/// Builds a live provider for the selected backend.
pub trait ProviderConnector: Send + Sync {
    /// Construct the provider for `kind` from `settings`.
    ///
    /// Fails with [`LlmError::AuthenticationFailed`] if the matching key is
    /// missing. A failure here is handled like a failed provider call.
    fn connect(
        &self,
        kind: ProviderKind,
        settings: &ProviderSettings,
    ) -> Result<BoxLlmProvider, LlmError>;
}
