//! Provider selection.
//!
//! Precedence: forced mock, then mock when nothing is configured, then
//! Gemini when its key is present, then OpenAI.

use std::fmt;

use oration_types::config::ProviderSettings;
use oration_types::llm::ProviderKind;

/// Why the mock responder was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockReason {
    /// `OPENAI_USE_MOCK=true` (or `force_mock` in config.toml).
    Forced,
    /// Neither provider key is configured.
    Unconfigured,
}

/// Where the next assistant reply comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    Mock(MockReason),
    Live(ProviderKind),
}

impl fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderChoice::Mock(MockReason::Forced) => write!(f, "mock (forced)"),
            ProviderChoice::Mock(MockReason::Unconfigured) => write!(f, "mock (no provider key)"),
            ProviderChoice::Live(kind) => write!(f, "{kind}"),
        }
    }
}

/// Choose the reply source for the given settings.
pub fn select_provider(settings: &ProviderSettings) -> ProviderChoice {
    let has_gemini = settings.has_gemini_key();
    let has_openai = settings.has_openai_key();

    if settings.force_mock {
        ProviderChoice::Mock(MockReason::Forced)
    } else if !has_gemini && !has_openai {
        ProviderChoice::Mock(MockReason::Unconfigured)
    } else if has_gemini {
        ProviderChoice::Live(ProviderKind::Gemini)
    } else {
        ProviderChoice::Live(ProviderKind::OpenAi)
    }
}
