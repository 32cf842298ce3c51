//! Authentication collaborator.

use super::model::User;
use async_trait::async_trait;

/// Narrow contract to the authentication backend.
///
/// Login and logout are redirect targets owned by the backend; the client
/// never performs them itself.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Returns the signed-in user, or `None` when there is no valid session.
    ///
    /// Transport failures also yield `None`.
    async fn current_user(&self) -> Option<User>;

    /// URL that starts the login flow.
    fn login_url(&self) -> String;

    /// URL that ends the session.
    fn logout_url(&self) -> String;
}
