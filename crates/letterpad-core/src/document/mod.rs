//! Document domain module.
//!
//! # Module Structure
//!
//! - `model`: `Document` and the `SaveRequest` payload
//! - `gateway`: `DocumentGateway` trait for remote persistence
//! - `query`: derived collection views (`CollectionQuery`, `SortOrder`)
//! - `text`: plain-text projection and counters (`TextStats`)
//!
//! # Usage
//!
//! ```ignore
//! use letterpad_core::document::{Document, DocumentGateway, SaveRequest};
//! use letterpad_core::document::{CollectionQuery, SortOrder, TextStats};
//! ```

mod gateway;
mod model;
mod query;
mod text;

// Re-export public API
pub use gateway::DocumentGateway;
pub use model::{Document, SaveRequest};
pub use query::{CollectionQuery, SortOrder};
pub use text::{TextStats, plain_text};
