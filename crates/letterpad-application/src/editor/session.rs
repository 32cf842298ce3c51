//! Edit state of one open document.

use super::format::{FormatCommand, History, Selection, apply_markup};
use letterpad_core::document::TextStats;
use letterpad_core::error::Result;
use letterpad_core::{Document, SaveRequest};
use strum::Display;

/// Externally visible phase of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EditorState {
    /// Title and body match the last saved snapshot.
    Clean,
    /// Local edits not yet persisted.
    Dirty,
    /// A save is in flight.
    Saving,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Snapshot {
    title: String,
    body: String,
}

impl Snapshot {
    fn of(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            body: document.body.clone(),
        }
    }

    fn matches(&self, document: &Document) -> bool {
        self.title == document.title && self.body == document.body
    }
}

/// Synchronous state machine behind the editor.
///
/// The phase is derived rather than stored: `Saving` while a request is in
/// flight, otherwise `Dirty` when title or body differ from the last
/// snapshot the server confirmed, otherwise `Clean`.
#[derive(Debug, Clone)]
pub struct EditSession {
    document: Document,
    saved: Snapshot,
    in_flight: Option<Snapshot>,
    history: History,
    stats: TextStats,
}

impl EditSession {
    /// Session for a new, never saved document.
    pub fn new(history_limit: usize) -> Self {
        Self::hydrate(Document::default(), history_limit)
    }

    /// Session for a document fetched from the store.
    pub fn hydrate(document: Document, history_limit: usize) -> Self {
        Self {
            saved: Snapshot::of(&document),
            stats: document.stats(),
            document,
            in_flight: None,
            history: History::new(history_limit),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn stats(&self) -> TextStats {
        self.stats
    }

    pub fn state(&self) -> EditorState {
        if self.in_flight.is_some() {
            EditorState::Saving
        } else if self.is_dirty() {
            EditorState::Dirty
        } else {
            EditorState::Clean
        }
    }

    /// True when title or body differ from the last confirmed save.
    pub fn is_dirty(&self) -> bool {
        !self.saved.matches(&self.document)
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replaces the title. Returns true if it changed.
    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        if title == self.document.title {
            return false;
        }
        self.document.title = title;
        true
    }

    /// Replaces the body, recording the previous one for undo.
    /// Returns true if it changed.
    pub fn set_body(&mut self, body: impl Into<String>) -> bool {
        let body = body.into();
        if body == self.document.body {
            return false;
        }
        let previous = std::mem::replace(&mut self.document.body, body);
        self.history.record(previous);
        self.stats = TextStats::from_markup(&self.document.body);
        true
    }

    /// Applies a formatting command. Returns true if the body changed.
    pub fn apply(&mut self, command: &FormatCommand, selection: Selection) -> bool {
        match command {
            FormatCommand::Undo => {
                let restored = self.history.undo(&self.document.body);
                self.restore(restored)
            }
            FormatCommand::Redo => {
                let restored = self.history.redo(&self.document.body);
                self.restore(restored)
            }
            _ => match apply_markup(&self.document.body, command, selection) {
                Some(body) => self.set_body(body),
                None => false,
            },
        }
    }

    fn restore(&mut self, body: Option<String>) -> bool {
        match body {
            Some(body) => {
                self.document.body = body;
                self.stats = TextStats::from_markup(&self.document.body);
                true
            }
            None => false,
        }
    }

    /// Starts a save of the current title and body.
    ///
    /// Returns `Ok(None)` when there is nothing to save.
    ///
    /// # Errors
    ///
    /// Returns `LetterError::ValidationFailed` when the trimmed title is
    /// empty. The session is left untouched.
    pub fn begin_save(&mut self) -> Result<Option<SaveRequest>> {
        if self.is_saving() || !self.is_dirty() {
            return Ok(None);
        }
        let request = self.document.save_request();
        request.validate()?;
        self.in_flight = Some(Snapshot::of(&self.document));
        Ok(Some(request))
    }

    /// Reconciles a successful save with the local state.
    ///
    /// The server record supplies identity and timestamps. Its title and
    /// body replace the local ones only if nothing was edited while the
    /// request was in flight.
    ///
    /// Returns true if edits are still unsaved and a follow-up save is
    /// needed.
    pub fn complete_save(&mut self, saved: &Document) -> bool {
        let sent = self.in_flight.take();

        if self.document.id.is_none() {
            self.document.id = saved.id.clone();
        }
        self.document.created_at = saved.created_at;
        self.document.updated_at = saved.updated_at;
        self.document.external_ref = saved.external_ref.clone();
        self.document.owner_id = saved.owner_id.clone();

        let untouched = sent.is_some_and(|sent| sent.matches(&self.document));
        if untouched {
            self.document.title = saved.title.clone();
            if self.document.body != saved.body {
                self.document.body = saved.body.clone();
                self.stats = TextStats::from_markup(&self.document.body);
            }
        }
        self.saved = Snapshot::of(saved);

        self.is_dirty()
    }

    /// Marks the in-flight save as failed; edits stay dirty.
    pub fn fail_save(&mut self) {
        self.in_flight = None;
    }
}
