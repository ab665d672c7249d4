//! Configuration types for Ladle.
//!
//! `LadleConfig` represents the top-level `ladle.toml` read from the data
//! directory. Every section and field has a default, so an empty file (or no
//! file at all) yields a runnable local configuration.

use serde::{Deserialize, Serialize};

use crate::widget::WidgetConfig;

/// Top-level configuration for the chat service and terminal widget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LadleConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cosmic: CosmicConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub widget: WidgetConfig,
}

/// Bind address for `ladle serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// Hosted content/AI bucket credentials and API roots.
///
/// Keys are kept as plain strings here; the infra client wraps them in
/// secret types as soon as it is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmicConfig {
    #[serde(default)]
    pub bucket_slug: String,

    #[serde(default)]
    pub read_key: String,

    #[serde(default)]
    pub write_key: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_workers_base")]
    pub workers_base: String,
}

fn default_api_base() -> String {
    "https://api.cosmicjs.com/v3".to_string()
}

fn default_workers_base() -> String {
    "https://workers.cosmicjs.com/v3".to_string()
}

impl Default for CosmicConfig {
    fn default() -> Self {
        Self {
            bucket_slug: String::new(),
            read_key: String::new(),
            write_key: String::new(),
            api_base: default_api_base(),
            workers_base: default_workers_base(),
        }
    }
}

impl CosmicConfig {
    /// Whether enough is configured to talk to the bucket at all.
    pub fn is_configured(&self) -> bool {
        !self.bucket_slug.is_empty() && !self.read_key.is_empty()
    }
}

/// Server-side chat behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Generation bound used when a request omits `maxTokens`.
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Upper bound on waiting for the upstream stream to open.
    #[serde(default = "default_open_timeout_secs")]
    pub open_timeout_secs: u64,

    /// Upper bound on the gap between consecutive upstream chunks.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_open_timeout_secs() -> u64 {
    30
}

fn default_idle_timeout_secs() -> u64 {
    60
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_max_tokens: default_max_tokens(),
            open_timeout_secs: default_open_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}
