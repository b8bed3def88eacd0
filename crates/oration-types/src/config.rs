//! Process-wide configuration types for Oration.
//!
//! `AppConfig` is assembled once at startup (defaults, then `config.toml`,
//! then environment overrides) and handed to the services that need it.
//! Provider credentials are wrapped in [`SecretString`] so they never show
//! up in `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Default primary (OpenAI) model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default secondary (Gemini) model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default Gemini API base URL (the `/v1/models/...` path is appended).
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default upper bound on a single provider HTTP call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Top-level configuration for the Oration service.
#[derive(Debug, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub providers: ProviderSettings,
}

/// Listen address for the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Credentials and tuning for the two candidate LLM providers.
///
/// Selection between the mock responder, Gemini and OpenAI is a pure
/// function of this struct (see `oration_core::llm::selector`).
#[derive(Debug)]
pub struct ProviderSettings {
    pub openai_api_key: Option<SecretString>,
    pub gemini_api_key: Option<SecretString>,
    pub openai_model: String,
    pub gemini_model: String,
    /// Skip every provider and answer with the mock responder.
    pub force_mock: bool,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            gemini_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            force_mock: false,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ProviderSettings {
    /// Whether a usable (non-blank) OpenAI key is configured.
    pub fn has_openai_key(&self) -> bool {
        is_present(self.openai_api_key.as_ref())
    }

    /// Whether a usable (non-blank) Gemini key is configured.
    pub fn has_gemini_key(&self) -> bool {
        is_present(self.gemini_api_key.as_ref())
    }
}

fn is_present(key: Option<&SecretString>) -> bool {
    key.is_some_and(|k| !k.expose_secret().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_settings_defaults() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.openai_model, "gpt-4o-mini");
        assert_eq!(settings.gemini_model, "gemini-1.5-flash");
        assert!(!settings.force_mock);
        assert!(!settings.has_openai_key());
        assert!(!settings.has_gemini_key());
        assert_eq!(settings.request_timeout_secs, 120);
    }

    #[test]
    fn test_blank_keys_are_absent() {
        let settings = ProviderSettings {
            openai_api_key: Some(SecretString::from("   ".to_string())),
            gemini_api_key: Some(SecretString::from("".to_string())),
            ..Default::default()
        };
        assert!(!settings.has_openai_key());
        assert!(!settings.has_gemini_key());
    }

    #[test]
    fn test_present_keys() {
        let settings = ProviderSettings {
            openai_api_key: Some(SecretString::from("sk-test".to_string())),
            gemini_api_key: Some(SecretString::from("gm-test".to_string())),
            ..Default::default()
        };
        assert!(settings.has_openai_key());
        assert!(settings.has_gemini_key());
    }

    #[test]
    fn test_debug_does_not_leak_keys() {
        let settings = ProviderSettings {
            openai_api_key: Some(SecretString::from("sk-very-secret".to_string())),
            ..Default::default()
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn test_server_config_from_partial_toml() {
        let config: ServerConfig = toml::from_str("port = 8080").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
    }
}
