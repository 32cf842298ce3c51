//! Application layer for Letterpad.
//!
//! This crate coordinates the domain contracts from `letterpad-core` into
//! the two stateful services a front end works with:
//!
//! - `SessionStore`: the signed-in user's Collection of documents
//! - `EditorSurface`: editing one document with debounced autosave

pub mod debounce;
pub mod editor;
pub mod store;

pub use debounce::Debouncer;
pub use editor::{
    EditSession, EditorOptions, EditorState, EditorSurface, FormatCommand, SaveOutcome, Selection,
};
pub use store::{AuthState, SessionStore, StoreStatus};
