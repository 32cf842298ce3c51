//! `AuthService` over the backend's session endpoints.

use super::client::ApiClient;
use async_trait::async_trait;
use letterpad_core::{AuthService, User};

/// Authentication collaborator backed by `/auth/*`.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: ApiClient,
}

impl HttpAuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn current_user(&self) -> Option<User> {
        match self.client.get_json::<User>("/auth/user", "user").await {
            Ok(user) => {
                tracing::info!("[HttpAuthService] Signed in as {}", user.id);
                Some(user)
            }
            Err(e) => {
                tracing::warn!("[HttpAuthService] Failed to get current user: {}", e);
                None
            }
        }
    }

    fn login_url(&self) -> String {
        self.client.public_url("/auth/google")
    }

    fn logout_url(&self) -> String {
        self.client.public_url("/auth/logout")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letterpad_core::config::GatewaySettings;

    #[test]
    fn test_redirect_targets() {
        let settings = GatewaySettings {
            base_url: "https://api.example".to_string(),
            ..GatewaySettings::default()
        };
        let auth = HttpAuthService::new(ApiClient::new(&settings).unwrap());
        assert_eq!(auth.login_url(), "https://api.example/auth/google");
        assert_eq!(auth.logout_url(), "https://api.example/auth/logout");
    }
}
