//! Domain layer for Letterpad.
//!
//! Holds the document model, the contracts of the external collaborators
//! (persistence gateway, authentication, notifications) and the shared
//! error and configuration types. No I/O happens here.

pub mod config;
pub mod document;
pub mod error;
pub mod notification;
pub mod user;

// Re-export common types
pub use document::{Document, DocumentGateway, SaveRequest};
pub use error::{LetterError, Result};
pub use notification::{Notification, NotificationLevel, Notifier};
pub use user::{AuthService, User};
