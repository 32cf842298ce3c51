//! Fixed-session `AuthService` for offline mode and tests.

use async_trait::async_trait;
use letterpad_core::{AuthService, User};
use std::sync::RwLock;

/// Auth service whose session is set by the caller.
#[derive(Debug, Default)]
pub struct StaticAuthService {
    user: RwLock<Option<User>>,
}

impl StaticAuthService {
    pub fn signed_in(user: User) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Replaces the session returned by `current_user`.
    pub fn set_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user;
    }
}

#[async_trait]
impl AuthService for StaticAuthService {
    async fn current_user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn login_url(&self) -> String {
        "letterpad://offline/login".to_string()
    }

    fn logout_url(&self) -> String {
        "letterpad://offline/logout".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_user() {
        let auth = StaticAuthService::signed_out();
        assert!(auth.current_user().await.is_none());

        auth.set_user(Some(User::new("u1")));
        assert_eq!(auth.current_user().await.unwrap().id, "u1");
    }
}
