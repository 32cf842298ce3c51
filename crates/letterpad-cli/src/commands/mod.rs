pub mod auth;
pub mod documents;
pub mod write;

use anyhow::{Context, Result};
use letterpad_application::{EditorOptions, SessionStore};
use letterpad_core::config::AppConfig;
use letterpad_core::{AuthService, DocumentGateway, User};
use letterpad_infrastructure::config_service::{self, ConfigService};
use letterpad_infrastructure::{
    ApiClient, HttpAuthService, HttpDocumentGateway, InMemoryDocumentGateway, StaticAuthService,
    TracingNotifier,
};
use std::path::Path;
use std::sync::Arc;

/// Loads and validates the configuration.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = service
        .get_config()
        .with_context(|| format!("Failed to load config from {}", service.path().display()))?;
    config_service::validate(&config)?;
    Ok(config)
}

/// Wired services shared by every command.
pub struct App {
    pub store: Arc<SessionStore>,
    pub editor_options: EditorOptions,
}

impl App {
    pub async fn build(config: &AppConfig, offline: bool) -> Result<Self> {
        let (gateway, auth): (Arc<dyn DocumentGateway>, Arc<dyn AuthService>) = if offline {
            tracing::info!("[App] Offline mode, using in-memory store");
            (
                Arc::new(InMemoryDocumentGateway::new()),
                Arc::new(StaticAuthService::signed_in(User::new("offline"))),
            )
        } else {
            let client = ApiClient::new(&config.gateway)?;
            (
                Arc::new(HttpDocumentGateway::new(client.clone())),
                Arc::new(HttpAuthService::new(client)),
            )
        };

        let store = SessionStore::start(gateway, auth, Arc::new(TracingNotifier)).await;
        Ok(Self {
            store: Arc::new(store),
            editor_options: EditorOptions::from(&config.editor),
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.store.auth_state().borrow().is_signed_in()
    }
}
