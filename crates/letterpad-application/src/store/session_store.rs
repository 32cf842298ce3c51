use letterpad_core::document::CollectionQuery;
use letterpad_core::error::{LetterError, Result};
use letterpad_core::{AuthService, Document, DocumentGateway, Notification, Notifier, SaveRequest, User};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, watch};

const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

/// Whether the store has a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    SignedIn(User),
    SignedOut,
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::SignedIn(user) => Some(user),
            AuthState::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }
}

/// Loading and error indicators for the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    /// A gateway call is in progress.
    pub loading: bool,
    /// Error of the most recent failed call, cleared by the next success.
    pub last_error: Option<LetterError>,
    /// The Collection reflects a completed list call and is not stale.
    pub loaded: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    collection: Vec<Document>,
    loaded: bool,
    pending: usize,
    last_error: Option<LetterError>,
    /// List calls currently waiting on the gateway.
    fetches: usize,
    /// Ids confirmed deleted while a list call was in flight.
    deleted_during_fetch: HashSet<String>,
}

/// Session-scoped cache of the signed-in user's documents.
///
/// `SessionStore` is responsible for:
/// - Resolving the current user and publishing `AuthState`
/// - Loading the Collection from the gateway and caching it
/// - Creating, updating and deleting documents through the gateway
/// - Reporting outcomes as notifications
///
/// The Collection only changes after a gateway call has completed: a save
/// is followed by a full re-list, a delete removes the entry once the
/// gateway confirmed it, and a re-list that overlapped that delete never
/// brings the entry back. An `Unauthorized` answer from any call signs the
/// user out and leaves the Collection as it was.
pub struct SessionStore {
    gateway: Arc<dyn DocumentGateway>,
    auth: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<StoreState>,
    auth_tx: watch::Sender<AuthState>,
    disposed: AtomicBool,
}

impl SessionStore {
    /// Creates a store and resolves the current user.
    pub async fn start(
        gateway: Arc<dyn DocumentGateway>,
        auth: Arc<dyn AuthService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let initial = match auth.current_user().await {
            Some(user) => {
                tracing::info!("[SessionStore] Started for user {}", user.id);
                AuthState::SignedIn(user)
            }
            None => {
                tracing::info!("[SessionStore] Started without a signed-in user");
                AuthState::SignedOut
            }
        };

        let (auth_tx, _) = watch::channel(initial);
        Self {
            gateway,
            auth,
            notifier,
            state: RwLock::new(StoreState::default()),
            auth_tx,
            disposed: AtomicBool::new(false),
        }
    }

    /// Ends the session: clears the Collection and rejects further calls.
    pub async fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        {
            let mut state = self.state.write().await;
            state.collection.clear();
            state.loaded = false;
        }
        self.auth_tx.send_replace(AuthState::SignedOut);
        tracing::info!("[SessionStore] Disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Subscribes to sign-in / sign-out transitions.
    pub fn auth_state(&self) -> watch::Receiver<AuthState> {
        self.auth_tx.subscribe()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.auth_tx.borrow().user().cloned()
    }

    pub fn login_url(&self) -> String {
        self.auth.login_url()
    }

    pub fn logout_url(&self) -> String {
        self.auth.logout_url()
    }

    /// Notifier used for this session's messages.
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    pub async fn status(&self) -> StoreStatus {
        let state = self.state.read().await;
        StoreStatus {
            loading: state.pending > 0,
            last_error: state.last_error.clone(),
            loaded: state.loaded,
        }
    }

    /// Returns the Collection, fetching it on first use or when stale.
    ///
    /// # Errors
    ///
    /// `Unauthorized` without a signed-in user or when the session expired,
    /// `RequestFailed` on transport failures.
    pub async fn list(&self) -> Result<Vec<Document>> {
        self.ensure_signed_in()?;
        {
            let state = self.state.read().await;
            if state.loaded {
                return Ok(state.collection.clone());
            }
        }
        self.fetch_collection().await
    }

    /// Re-fetches the Collection regardless of the cache.
    pub async fn refresh(&self) -> Result<Vec<Document>> {
        self.ensure_signed_in()?;
        self.fetch_collection().await
    }

    /// Marks the Collection stale; the next `list` goes to the gateway.
    pub async fn invalidate(&self) {
        self.state.write().await.loaded = false;
    }

    /// Filtered and sorted view of the cached Collection.
    pub async fn query(&self, query: &CollectionQuery) -> Vec<Document> {
        query.apply(&self.state.read().await.collection)
    }

    /// Fetches one document. Does not require a prior `list`.
    pub async fn get(&self, id: &str) -> Result<Document> {
        self.ensure_signed_in()?;
        tracing::debug!("[SessionStore] get id={}", id);

        self.begin_request().await;
        let result = self.gateway.get_document(id).await;
        self.end_request(result.as_ref().err()).await;

        result.inspect_err(|e| {
            let message = if e.is_not_found() {
                "Letter not found"
            } else {
                "Failed to load letter"
            };
            self.handle_failure(e, message);
        })
    }

    /// Creates or updates a document and returns the server's record.
    ///
    /// A successful save is followed by a full re-list. If that re-list
    /// fails, the save still succeeds and the Collection is left stale.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for a blank title (no gateway call), otherwise
    /// whatever the gateway reported for the save itself.
    pub async fn save(&self, request: &SaveRequest) -> Result<Document> {
        self.ensure_signed_in()?;
        request.validate()?;
        tracing::debug!(
            "[SessionStore] save id={:?}, update={}",
            request.id,
            request.is_update()
        );

        self.begin_request().await;
        let result = self.gateway.save_document(request).await;
        self.end_request(result.as_ref().err()).await;

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                self.handle_failure(&e, "Failed to save letter");
                return Err(e);
            }
        };

        if self.fetch_collection().await.is_err() {
            self.invalidate().await;
            tracing::warn!("[SessionStore] Saved {:?} but re-list failed", saved.id);
        }

        self.notifier
            .notify(Notification::success("Letter saved successfully"));
        Ok(saved)
    }

    /// Deletes a document. Returns true once the gateway confirmed it.
    ///
    /// Failures are reported through the notifier, never as an error.
    pub async fn delete(&self, id: &str) -> bool {
        if self.ensure_signed_in().is_err() {
            return false;
        }
        tracing::debug!("[SessionStore] delete id={}", id);

        self.begin_request().await;
        let result = self.gateway.delete_document(id).await;
        self.end_request(result.as_ref().err()).await;

        match result {
            Ok(()) => {
                {
                    let mut state = self.state.write().await;
                    state.collection.retain(|doc| doc.id.as_deref() != Some(id));
                    if state.fetches > 0 {
                        state.deleted_during_fetch.insert(id.to_string());
                    }
                }
                self.notifier
                    .notify(Notification::success("Letter deleted successfully"));
                true
            }
            Err(e) => {
                self.handle_failure(&e, "Failed to delete letter");
                false
            }
        }
    }

    fn ensure_signed_in(&self) -> Result<()> {
        if self.is_disposed() || !self.auth_tx.borrow().is_signed_in() {
            return Err(LetterError::Unauthorized);
        }
        Ok(())
    }

    async fn fetch_collection(&self) -> Result<Vec<Document>> {
        tracing::debug!("[SessionStore] Fetching collection");
        self.begin_request().await;
        self.state.write().await.fetches += 1;
        let result = self.gateway.list_documents().await;
        self.end_request(result.as_ref().err()).await;

        // A delete confirmed after the list snapshot was taken must stay deleted.
        let deleted = {
            let mut state = self.state.write().await;
            state.fetches = state.fetches.saturating_sub(1);
            if state.fetches == 0 {
                std::mem::take(&mut state.deleted_during_fetch)
            } else {
                state.deleted_during_fetch.clone()
            }
        };

        match result {
            Ok(documents) => {
                let documents: Vec<Document> = unique_by_id(documents)
                    .into_iter()
                    .filter(|doc| doc.id.as_ref().is_none_or(|id| !deleted.contains(id)))
                    .collect();
                let mut state = self.state.write().await;
                state.collection = documents.clone();
                state.loaded = true;
                tracing::debug!("[SessionStore] Loaded {} documents", documents.len());
                Ok(documents)
            }
            Err(e) => {
                self.handle_failure(&e, "Failed to load letters");
                Err(e)
            }
        }
    }

    async fn begin_request(&self) {
        self.state.write().await.pending += 1;
    }

    async fn end_request(&self, error: Option<&LetterError>) {
        let mut state = self.state.write().await;
        state.pending = state.pending.saturating_sub(1);
        state.last_error = error.cloned();
    }

    /// Applies the failure policy: an expired session signs the user out,
    /// anything else is a transient notification.
    fn handle_failure(&self, error: &LetterError, message: &str) {
        if error.is_unauthorized() {
            self.expire_session();
        } else {
            tracing::warn!("[SessionStore] {}: {}", message, error);
            self.notifier.notify(Notification::error(message));
        }
    }

    fn expire_session(&self) {
        let was_signed_in = self.auth_tx.send_replace(AuthState::SignedOut).is_signed_in();
        if was_signed_in {
            tracing::warn!("[SessionStore] Session expired, signing out");
        }
        self.notifier.notify(Notification::error(SESSION_EXPIRED));
    }
}

/// Keeps the first entry for every id.
fn unique_by_id(documents: Vec<Document>) -> Vec<Document> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| match &doc.id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect()
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("auth", &*self.auth_tx.borrow())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;
