//! Configuration loader for Oration.
//!
//! Builds an [`AppConfig`] in three layers: built-in defaults, then
//! `{data_dir}/config.toml`, then environment variables. A missing or
//! malformed file falls back to the defaults.

use std::path::Path;

use oration_types::config::AppConfig;
use secrecy::SecretString;
use serde::Deserialize;

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerSection,
    providers: ProvidersSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProvidersSection {
    openai_api_key: Option<String>,
    gemini_api_key: Option<String>,
    openai_model: Option<String>,
    gemini_model: Option<String>,
    force_mock: Option<bool>,
    openai_base_url: Option<String>,
    gemini_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Load configuration from `{data_dir}/config.toml` and the process environment.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    load_config_with_env(data_dir, |name| std::env::var(name).ok()).await
}

/// Same as [`load_config`] with an explicit environment lookup.
pub async fn load_config_with_env<F>(data_dir: &Path, env: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = AppConfig::default();
    if let Some(file) = read_config_file(data_dir).await {
        apply_file(&mut config, file);
    }
    apply_env(&mut config, env);
    config
}

async fn read_config_file(data_dir: &Path) -> Option<ConfigFile> {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return None;
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return None;
        }
    };

    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Some(file),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            None
        }
    }
}

fn apply_file(config: &mut AppConfig, file: ConfigFile) {
    if let Some(host) = file.server.host {
        config.server.host = host;
    }
    if let Some(port) = file.server.port {
        config.server.port = port;
    }

    let providers = &mut config.providers;
    let section = file.providers;
    if let Some(key) = section.openai_api_key {
        providers.openai_api_key = Some(SecretString::from(key));
    }
    if let Some(key) = section.gemini_api_key {
        providers.gemini_api_key = Some(SecretString::from(key));
    }
    if let Some(model) = section.openai_model {
        providers.openai_model = model;
    }
    if let Some(model) = section.gemini_model {
        providers.gemini_model = model;
    }
    if let Some(force_mock) = section.force_mock {
        providers.force_mock = force_mock;
    }
    if let Some(url) = section.openai_base_url {
        providers.openai_base_url = url;
    }
    if let Some(url) = section.gemini_base_url {
        providers.gemini_base_url = url;
    }
    if let Some(secs) = section.request_timeout_secs {
        providers.request_timeout_secs = secs;
    }
}

fn apply_env<F>(config: &mut AppConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let providers = &mut config.providers;

    if let Some(key) = env("OPENAI_API_KEY") {
        providers.openai_api_key = Some(SecretString::from(key));
    }
    // GOOGLE_API_KEY takes precedence over GEMINI_API_KEY.
    if let Some(key) = env("GOOGLE_API_KEY").or_else(|| env("GEMINI_API_KEY")) {
        providers.gemini_api_key = Some(SecretString::from(key));
    }
    if let Some(model) = env("OPENAI_MODEL").filter(|m| !m.trim().is_empty()) {
        providers.openai_model = model;
    }
    if let Some(model) = env("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
        providers.gemini_model = model;
    }
    // Only the exact string "true" enables the mock; any other value disables it.
    if let Some(flag) = env("OPENAI_USE_MOCK") {
        providers.force_mock = flag == "true";
    }

    if let Some(host) = env("ORATION_HOST") {
        config.server.host = host;
    }
    if let Some(port) = env("ORATION_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(err) => tracing::warn!("Ignoring ORATION_PORT={port}: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        |_| None
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_with_env(tmp.path(), no_env()).await;

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert!(!config.providers.force_mock);
        assert!(!config.providers.has_openai_key());
        assert_eq!(config.providers.openai_model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
port = 8080

[providers]
gemini_api_key = "gm-from-file"
gemini_model = "gemini-2.0-flash"
request_timeout_secs = 30
"#,
        )
        .await
        .unwrap();

        let config = load_config_with_env(tmp.path(), no_env()).await;
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.providers.has_gemini_key());
        assert_eq!(config.providers.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.providers.request_timeout_secs, 30);
        assert_eq!(config.providers.openai_model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config_with_env(tmp.path(), no_env()).await;
        assert_eq!(config.server.port, 3000);
        assert!(!config.providers.has_gemini_key());
    }

    #[tokio::test]
    async fn env_overrides_file() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "[providers]\nforce_mock = true\nopenai_model = \"gpt-4o\"\n",
        )
        .await
        .unwrap();

        let env = env_from(&[
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_MODEL", "gpt-4.1-mini"),
            ("OPENAI_USE_MOCK", "false"),
            ("ORATION_PORT", "4100"),
        ]);
        let config = load_config_with_env(tmp.path(), env).await;

        assert_eq!(
            config.providers.openai_api_key.as_ref().unwrap().expose_secret(),
            "sk-env"
        );
        assert_eq!(config.providers.openai_model, "gpt-4.1-mini");
        assert!(!config.providers.force_mock);
        assert_eq!(config.server.port, 4100);
    }

    #[tokio::test]
    async fn google_key_wins_over_gemini_key() {
        let tmp = TempDir::new().unwrap();
        let env = env_from(&[("GOOGLE_API_KEY", "google"), ("GEMINI_API_KEY", "gemini")]);
        let config = load_config_with_env(tmp.path(), env).await;
        assert_eq!(
            config.providers.gemini_api_key.as_ref().unwrap().expose_secret(),
            "google"
        );

        let env = env_from(&[("GEMINI_API_KEY", "gemini")]);
        let config = load_config_with_env(tmp.path(), env).await;
        assert_eq!(
            config.providers.gemini_api_key.as_ref().unwrap().expose_secret(),
            "gemini"
        );
    }

    #[tokio::test]
    async fn use_mock_requires_exact_true() {
        let tmp = TempDir::new().unwrap();

        let config = load_config_with_env(tmp.path(), env_from(&[("OPENAI_USE_MOCK", "true")])).await;
        assert!(config.providers.force_mock);

        for value in ["TRUE", "1", "yes", ""] {
            let config =
                load_config_with_env(tmp.path(), env_from(&[("OPENAI_USE_MOCK", value)])).await;
            assert!(!config.providers.force_mock, "value {value:?}");
        }
    }

    #[tokio::test]
    async fn bad_port_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_with_env(tmp.path(), env_from(&[("ORATION_PORT", "http")])).await;
        assert_eq!(config.server.port, 3000);
    }
}
