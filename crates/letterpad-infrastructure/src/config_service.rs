//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the application
//! configuration from the configuration file (~/.config/letterpad/config.toml)
//! and applies environment overrides on top of it.

use crate::paths::LetterpadPaths;
use letterpad_core::config::AppConfig;
use letterpad_core::error::{LetterError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Overrides `gateway.base_url`.
pub const ENV_API_URL: &str = "LETTERPAD_API_URL";
/// Overrides `gateway.access_token`.
pub const ENV_TOKEN: &str = "LETTERPAD_TOKEN";

/// Configuration service that loads and caches the application configuration.
///
/// A missing file is created with the default configuration on first
/// access. The loaded value is cached until `invalidate_cache` is called.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService for the platform default location.
    ///
    /// # Errors
    ///
    /// Returns `LetterError::Config` if the config directory cannot be resolved.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(LetterpadPaths::config_file()?))
    }

    /// Creates a ConfigService for an explicit file (tests, `--config`).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Path of the backing config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, created or parsed.
    pub fn get_config(&self) -> Result<AppConfig> {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = Self::load_config(&self.path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Loads AppConfig from `path`, writing the defaults if the file is missing.
    fn load_config(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            let default_config = AppConfig::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            tracing::info!("[ConfigService] Created default config at {:?}", path);
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded config from {:?}", path);
        Ok(config)
    }
}

/// Applies environment overrides using the given variable lookup.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.gateway.base_url = url;
    }
    if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
        config.gateway.access_token = Some(token);
    }
}

/// Returns an error unless the config can be used to reach a backend.
pub fn validate(config: &AppConfig) -> Result<()> {
    if config.gateway.base_url.trim().is_empty() {
        return Err(LetterError::config("gateway.base_url must not be empty"));
    }
    if config.gateway.transport == letterpad_core::config::TransportMode::Proxy
        && config.gateway.proxy_prefix.trim().is_empty()
    {
        return Err(LetterError::config(
            "gateway.proxy_prefix is required when transport = \"proxy\"",
        ));
    }
    Ok(())
}
