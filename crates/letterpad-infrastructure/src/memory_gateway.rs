//! In-memory `DocumentGateway` for offline use and tests.

use async_trait::async_trait;
use chrono::Utc;
use letterpad_core::error::{LetterError, Result};
use letterpad_core::{Document, DocumentGateway, SaveRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Gateway that keeps documents in process memory.
///
/// Behaves like the remote backend: assigns identifiers and timestamps,
/// rejects blank titles and reports unknown ids as `NotFound`. A few hooks
/// let callers simulate an expired session or a one-off failure.
#[derive(Debug, Default)]
pub struct InMemoryDocumentGateway {
    documents: RwLock<HashMap<String, Document>>,
    /// Insertion order, so listing is stable.
    order: RwLock<Vec<String>>,
    unauthorized: AtomicBool,
    next_failure: Mutex<Option<LetterError>>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    save_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryDocumentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-populated with `documents`.
    ///
    /// Documents without an id get one assigned.
    pub async fn with_documents(documents: Vec<Document>) -> Self {
        let gateway = Self::new();
        for doc in documents {
            gateway.insert(doc).await;
        }
        gateway
    }

    /// Stores a document as-is, assigning an id if it has none.
    pub async fn insert(&self, mut doc: Document) -> Document {
        let id = doc
            .id
            .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
            .clone();
        let mut documents = self.documents.write().await;
        if documents.insert(id.clone(), doc.clone()).is_none() {
            self.order.write().await.push(id);
        }
        doc
    }

    /// Simulates an expired session: every call fails with `Unauthorized`.
    pub fn set_authorized(&self, authorized: bool) {
        self.unauthorized.store(!authorized, Ordering::SeqCst);
    }

    /// Makes the next gateway call fail with `error`.
    pub async fn fail_next(&self, error: LetterError) {
        *self.next_failure.lock().await = Some(error);
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Direct read access, bypassing hooks and counters.
    pub async fn peek(&self, id: &str) -> Option<Document> {
        self.documents.read().await.get(id).cloned()
    }

    async fn check(&self) -> Result<()> {
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(LetterError::Unauthorized);
        }
        if let Some(err) = self.next_failure.lock().await.take() {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentGateway for InMemoryDocumentGateway {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;

        let documents = self.documents.read().await;
        let order = self.order.read().await;
        Ok(order
            .iter()
            .filter_map(|id| documents.get(id).cloned())
            .collect())
    }

    async fn get_document(&self, id: &str) -> Result<Document> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;

        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| LetterError::not_found("Document", id))
    }

    async fn save_document(&self, request: &SaveRequest) -> Result<Document> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;
        request.validate()?;

        let now = Utc::now();
        let mut documents = self.documents.write().await;
        let saved = match &request.id {
            Some(id) => {
                let existing = documents
                    .get_mut(id)
                    .ok_or_else(|| LetterError::not_found("Document", id))?;
                existing.title = request.title.clone();
                existing.body = request.body.clone();
                existing.updated_at = Some(now);
                existing.clone()
            }
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                let doc = Document {
                    id: Some(id.clone()),
                    title: request.title.clone(),
                    body: request.body.clone(),
                    created_at: Some(now),
                    updated_at: Some(now),
                    ..Document::default()
                };
                documents.insert(id.clone(), doc.clone());
                self.order.write().await.push(id);
                doc
            }
        };

        tracing::debug!("[InMemoryDocumentGateway] Saved document {:?}", saved.id);
        Ok(saved)
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check().await?;

        if self.documents.write().await.remove(id).is_none() {
            return Err(LetterError::not_found("Document", id));
        }
        self.order.write().await.retain(|existing| existing != id);
        Ok(())
    }
}
