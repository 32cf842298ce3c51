//! Editor surface for a single document.
//!
//! # Module Structure
//!
//! - `session`: `EditSession`, the synchronous Clean/Dirty/Saving state machine
//! - `format`: formatting commands, selections and undo history
//! - `surface`: `EditorSurface`, wiring the session to autosave and the store
//!
//! # Usage
//!
//! ```ignore
//! let editor = EditorSurface::new_document(store.clone(), EditorOptions::default());
//! editor.set_title("Dear Ann");
//! editor.set_body("<p>Thank you for the letter.</p>");
//! let document = editor.close().await?;
//! ```

mod format;
mod session;
mod surface;

pub use format::{Alignment, FormatCommand, History, Selection, apply_markup};
pub use session::{EditSession, EditorState};
pub use surface::{EditorOptions, EditorSurface, SaveOutcome};
