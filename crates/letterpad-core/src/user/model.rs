//! User domain model.

use serde::{Deserialize, Serialize};

/// The authenticated user as reported by the auth collaborator.
///
/// The core only needs to know whether a user is present; the token is
/// carried along for transports that authenticate with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            access_token: None,
        }
    }
}
