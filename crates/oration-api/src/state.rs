//! Application state wiring the chat service to its infrastructure.
//!
//! `ChatService` is generic over its repository and provider connector;
//! AppState pins it to the SQLite store and the HTTP connector.

use std::path::PathBuf;
use std::sync::Arc;

use oration_core::chat::service::ChatService;
use oration_infra::config::load_config;
use oration_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use oration_infra::llm::HttpProviderConnector;
use oration_infra::sqlite::chat::SqliteChatRepository;
use oration_infra::sqlite::pool::{DatabasePool, database_url};
use oration_types::config::{ProviderSettings, ServerConfig};

/// Concrete chat service pinned to the infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository, HttpProviderConnector>;

/// Shared application state used by CLI commands and REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub server: ServerConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Resolve the data directory, load configuration, open the database and
    /// wire the chat service.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        tracing::debug!(data_dir = %data_dir.display(), "application state initialized");
        Ok(Self::from_parts(data_dir, db_pool, config.server, config.providers))
    }

    /// Assemble state from already-initialized parts.
    pub fn from_parts(
        data_dir: PathBuf,
        db_pool: DatabasePool,
        server: ServerConfig,
        providers: ProviderSettings,
    ) -> Self {
        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            HttpProviderConnector::new(),
            providers,
        );

        Self {
            chat_service: Arc::new(chat_service),
            server,
            data_dir,
            db_pool,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// State over a fresh temp-file database with the mock responder forced.
    pub async fn mock_state() -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("api.db").display());
        let data_dir = dir.path().to_path_buf();
        std::mem::forget(dir);

        let pool = DatabasePool::new(&url).await.unwrap();
        let providers = ProviderSettings {
            force_mock: true,
            ..Default::default()
        };
        AppState::from_parts(data_dir, pool, ServerConfig::default(), providers)
    }
}
