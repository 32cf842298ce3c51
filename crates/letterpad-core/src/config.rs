//! Application configuration model.
//!
//! Every field has a default so a partial (or missing) `config.toml` still
//! yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default persistence backend.
pub const DEFAULT_API_URL: &str = "https://letter-app-backend.vercel.app";

/// Default quiet period before an autosave fires.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 3000;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub editor: EditorSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// How requests reach the backend.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Request the backend URL as is.
    #[default]
    Direct,
    /// Prefix every backend URL with `proxy_prefix`.
    Proxy,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub transport: TransportMode,
    #[serde(default)]
    pub proxy_prefix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token. Usually supplied through `LETTERPAD_TOKEN` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            transport: TransportMode::Direct,
            proxy_prefix: String::new(),
            timeout_secs: default_timeout_secs(),
            access_token: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    #[serde(default = "default_true")]
    pub autosave: bool,
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl EditorSettings {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            autosave: true,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            history_limit: default_history_limit(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

fn default_history_limit() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}
