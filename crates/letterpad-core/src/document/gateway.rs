//! Persistence gateway trait.
//!
//! Defines the interface for remote document persistence.

use super::model::{Document, SaveRequest};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract gateway to the remote document store.
///
/// This trait decouples the session store from the transport (HTTP,
/// in-memory, ...). Authentication is carried by the implementation; an
/// expired or missing session surfaces as `LetterError::Unauthorized`.
///
/// # Error signals
///
/// | Operation | Errors |
/// |---|---|
/// | `list_documents` | `Unauthorized`, `RequestFailed` |
/// | `get_document` | `Unauthorized`, `NotFound`, `RequestFailed` |
/// | `save_document` | `Unauthorized`, `ValidationFailed`, `RequestFailed` |
/// | `delete_document` | `Unauthorized`, `RequestFailed` |
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// Lists every document of the authenticated user, in server order.
    async fn list_documents(&self) -> Result<Vec<Document>>;

    /// Fetches a single document by identifier.
    async fn get_document(&self, id: &str) -> Result<Document>;

    /// Creates (no `id`) or updates (with `id`) a document.
    ///
    /// # Returns
    ///
    /// The canonical record as stored by the server, including the
    /// assigned identifier and timestamps.
    async fn save_document(&self, request: &SaveRequest) -> Result<Document>;

    /// Deletes a document by identifier.
    async fn delete_document(&self, id: &str) -> Result<()>;
}
