//! Application state wiring the chat pipeline together.
//!
//! The pipeline is generic over provider and content-source traits; AppState
//! pins it to boxed trait objects so the server can run against Cosmic in
//! production and against mocks in tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use ladle_core::knowledge::source::BoxContentSource;
use ladle_core::llm::adapter::{StreamAdapter, UpstreamTimeouts};
use ladle_core::llm::box_provider::BoxUpstreamProvider;
use ladle_core::upload::{BoxMediaStore, DisabledMediaStore};
use ladle_infra::config::{apply_env_overrides, load_config};
use ladle_infra::cosmic::CosmicClient;
use ladle_infra::filesystem::{config_path, resolve_data_dir};
use ladle_types::config::LadleConfig;

/// Stream adapter pinned to boxed ports.
pub type ChatAdapter = StreamAdapter<BoxUpstreamProvider, BoxContentSource>;

/// Resolved data directory plus effective configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub config: LadleConfig,
}

impl Settings {
    /// Load `ladle.toml` (or `config_override`) and apply environment overrides.
    pub async fn load(config_override: Option<&Path>) -> Self {
        let data_dir = resolve_data_dir();
        let path = config_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config_path(&data_dir));

        let mut config = load_config(&path).await;
        apply_env_overrides(&mut config);
        tracing::debug!(path = %path.display(), data_dir = %data_dir.display(), "configuration loaded");

        Self { data_dir, config }
    }

    /// Cosmic client for the configured bucket.
    pub fn cosmic_client(&self) -> anyhow::Result<CosmicClient> {
        CosmicClient::new(&self.config.cosmic).with_context(|| {
            "Cosmic is not configured. Set COSMIC_BUCKET_SLUG and COSMIC_READ_KEY \
             (and COSMIC_WRITE_KEY for chat) or fill the [cosmic] section of ladle.toml"
                .to_string()
        })
    }
}

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<ChatAdapter>,
    pub media: Arc<BoxMediaStore>,
    pub config: Arc<LadleConfig>,
}

impl AppState {
    /// Wire the server against Cosmic.
    pub fn init(settings: &Settings) -> anyhow::Result<Self> {
        let client = settings.cosmic_client()?;

        if !client.can_write() {
            tracing::warn!(
                bucket = client.bucket_slug(),
                "no Cosmic write key: chat requests will fail and uploads are disabled"
            );
        }

        let media = if client.can_write() {
            BoxMediaStore::new(client.clone())
        } else {
            BoxMediaStore::new(DisabledMediaStore)
        };

        Ok(Self::with_services(
            settings.config.clone(),
            BoxUpstreamProvider::new(client.clone()),
            BoxContentSource::new(client),
            media,
        ))
    }

    /// Wire the server from explicit ports.
    pub fn with_services(
        config: LadleConfig,
        provider: BoxUpstreamProvider,
        content: BoxContentSource,
        media: BoxMediaStore,
    ) -> Self {
        let timeouts = UpstreamTimeouts::from(&config.chat);
        Self {
            adapter: Arc::new(StreamAdapter::new(provider, content, timeouts)),
            media: Arc::new(media),
            config: Arc::new(config),
        }
    }
}
