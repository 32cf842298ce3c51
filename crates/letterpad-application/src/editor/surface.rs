use super::format::{FormatCommand, Selection};
use super::session::{EditSession, EditorState};
use crate::debounce::{DebouncedAction, Debouncer};
use crate::store::SessionStore;
use futures::FutureExt;
use letterpad_core::config::EditorSettings;
use letterpad_core::document::TextStats;
use letterpad_core::error::{LetterError, Result};
use letterpad_core::{Document, Notification, Notifier};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

/// Editor behaviour taken from the `[editor]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub autosave: bool,
    pub autosave_delay: Duration,
    pub history_limit: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self::from(&EditorSettings::default())
    }
}

impl From<&EditorSettings> for EditorOptions {
    fn from(settings: &EditorSettings) -> Self {
        Self {
            autosave: settings.autosave,
            autosave_delay: settings.autosave_delay(),
            history_limit: settings.history_limit,
        }
    }
}

/// Result of a save request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The server stored the document. `created` is true when the save
    /// assigned the id.
    Saved { document: Document, created: bool },
    /// Nothing changed since the last save; no call was made.
    Unchanged,
    /// Another save is in flight. The current content is saved after it
    /// settles.
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveTrigger {
    Manual,
    Autosave,
    Close,
}

struct EditorInner {
    store: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    options: EditorOptions,
    session: Mutex<EditSession>,
    /// Held for the duration of a gateway save.
    save_lock: tokio::sync::Mutex<()>,
    debouncer: Debouncer,
    /// Set once the surface is closed or dropped.
    closing: AtomicBool,
}

/// The editor for one open document.
///
/// Title and body edits are applied synchronously and, with autosave on,
/// restart the debounce timer. When the timer fires the current content is
/// saved through the `SessionStore`. At most one save is in flight; edits
/// made meanwhile are saved by a follow-up once it settles.
///
/// Must be used from within a tokio runtime. Call `close` when done;
/// dropping the surface with a pending timer still saves in the background.
pub struct EditorSurface {
    inner: Arc<EditorInner>,
}

impl EditorSurface {
    /// Opens an editor on a new, unsaved document.
    pub fn new_document(store: Arc<SessionStore>, options: EditorOptions) -> Self {
        let session = EditSession::new(options.history_limit);
        Self::with_session(store, options, session)
    }

    /// Opens an editor on an existing document.
    ///
    /// # Errors
    ///
    /// Whatever `SessionStore::get` reports; the store has already notified
    /// the user ("Letter not found", "Failed to load letter").
    pub async fn open(store: Arc<SessionStore>, id: &str, options: EditorOptions) -> Result<Self> {
        let document = store.get(id).await?;
        tracing::debug!("[EditorSurface] Opened document {}", id);
        let session = EditSession::hydrate(document, options.history_limit);
        Ok(Self::with_session(store, options, session))
    }

    fn with_session(store: Arc<SessionStore>, options: EditorOptions, session: EditSession) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<EditorInner>| {
            let weak = weak.clone();
            let action: DebouncedAction = Arc::new(move || {
                let weak = weak.clone();
                async move {
                    if let Some(inner) = weak.upgrade() {
                        inner.autosave().await;
                    }
                }
                .boxed()
            });

            EditorInner {
                notifier: store.notifier(),
                store,
                options,
                session: Mutex::new(session),
                save_lock: tokio::sync::Mutex::new(()),
                debouncer: Debouncer::new(options.autosave_delay, action),
                closing: AtomicBool::new(false),
            }
        });
        Self { inner }
    }

    pub fn state(&self) -> EditorState {
        self.inner.session().state()
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.session().is_dirty()
    }

    /// Copy of the document as currently edited.
    pub fn snapshot(&self) -> Document {
        self.inner.session().document().clone()
    }

    pub fn document_id(&self) -> Option<String> {
        self.inner.session().document().id.clone()
    }

    /// Word and character counts of the current body.
    pub fn stats(&self) -> TextStats {
        self.inner.session().stats()
    }

    pub fn can_undo(&self) -> bool {
        self.inner.session().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.session().can_redo()
    }

    /// Returns true while an autosave timer is waiting.
    pub fn autosave_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let changed = self.inner.session().set_title(title);
        if changed {
            self.inner.touched();
        }
    }

    pub fn set_body(&self, body: impl Into<String>) {
        let changed = self.inner.session().set_body(body);
        if changed {
            self.inner.touched();
        }
    }

    /// Applies a formatting command. Returns true if the body changed.
    pub fn apply(&self, command: FormatCommand, selection: Selection) -> bool {
        let changed = self.inner.session().apply(&command, selection);
        if changed {
            tracing::debug!("[EditorSurface] Applied {:?}", command);
            self.inner.touched();
        }
        changed
    }

    /// Saves now, bypassing the debounce timer.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for a blank title (the user is notified, no call
    /// is made), otherwise the store's error for the failed save.
    pub async fn save(&self) -> Result<SaveOutcome> {
        self.inner.save(SaveTrigger::Manual).await
    }

    /// Runs a pending autosave immediately. Returns true if one was pending.
    pub async fn flush(&self) -> bool {
        self.inner.debouncer.flush().await
    }

    /// Closes the editor.
    ///
    /// Cancels the autosave timer, waits for an in-flight save and saves
    /// once more if edits remain. Returns the final document.
    ///
    /// # Errors
    ///
    /// The error of the final save. A blank title yields `ValidationFailed`.
    pub async fn close(self) -> Result<Document> {
        let inner = self.inner.clone();
        inner.closing.store(true, Ordering::SeqCst);
        inner.debouncer.cancel();

        let result = {
            let _guard = inner.save_lock.lock().await;
            inner.save_locked(SaveTrigger::Close).await
        };
        tracing::debug!("[EditorSurface] Closed");

        result.map(|_| inner.session().document().clone())
    }
}

impl Drop for EditorSurface {
    fn drop(&mut self) {
        if self.inner.closing.swap(true, Ordering::SeqCst) {
            return;
        }
        if !self.inner.debouncer.cancel() {
            return;
        }

        let inner = self.inner.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!("[EditorSurface] Dropped with pending autosave, saving in background");
                handle.spawn(async move {
                    let _guard = inner.save_lock.lock().await;
                    if let Err(e) = inner.save_locked(SaveTrigger::Close).await {
                        tracing::warn!("[EditorSurface] Background save failed: {}", e);
                    }
                });
            }
            Err(_) => {
                tracing::warn!("[EditorSurface] Dropped outside a runtime, pending edits not saved");
            }
        }
    }
}

impl std::fmt::Debug for EditorSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSurface")
            .field("state", &self.state())
            .field("document_id", &self.document_id())
            .finish_non_exhaustive()
    }
}

impl EditorInner {
    fn session(&self) -> MutexGuard<'_, EditSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Called after every effective edit.
    fn touched(&self) {
        if self.options.autosave && !self.closing.load(Ordering::SeqCst) {
            self.debouncer.schedule();
        }
    }

    async fn autosave(&self) {
        match self.save(SaveTrigger::Autosave).await {
            Ok(SaveOutcome::Saved { document, .. }) => {
                tracing::debug!("[EditorSurface] Autosaved {:?}", document.id);
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("[EditorSurface] Autosave not performed: {}", e),
        }
    }

    async fn save(&self, trigger: SaveTrigger) -> Result<SaveOutcome> {
        let Ok(_guard) = self.save_lock.try_lock() else {
            tracing::debug!("[EditorSurface] {:?} save deferred, another save in flight", trigger);
            return Ok(SaveOutcome::Deferred);
        };
        self.save_locked(trigger).await
    }

    /// Runs the save loop. The caller holds `save_lock`.
    async fn save_locked(&self, trigger: SaveTrigger) -> Result<SaveOutcome> {
        let mut outcome = SaveOutcome::Unchanged;
        let mut created = false;

        loop {
            let started = self.session().begin_save();
            let request = match started {
                Ok(Some(request)) => request,
                Ok(None) => return Ok(outcome),
                Err(e) => {
                    if trigger == SaveTrigger::Manual {
                        self.notify_validation(&e);
                    }
                    return Err(e);
                }
            };

            created |= !request.is_update();
            let saved = match self.store.save(&request).await {
                Ok(saved) => saved,
                Err(e) => {
                    self.session().fail_save();
                    return Err(e);
                }
            };

            let followup = self.session().complete_save(&saved);
            outcome = SaveOutcome::Saved {
                document: saved,
                created,
            };
            if !followup {
                return Ok(outcome);
            }

            if self.closing.load(Ordering::SeqCst) {
                continue;
            }
            if !self.debouncer.is_pending() {
                self.debouncer.schedule();
            }
            return Ok(outcome);
        }
    }

    fn notify_validation(&self, error: &LetterError) {
        if let LetterError::ValidationFailed(message) = error {
            self.notifier.notify(Notification::error(message.clone()));
        }
    }
}

#[cfg(test)]
#[path = "surface_test.rs"]
mod tests;
