//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: authenticated `User`
//! - `service`: `AuthService` trait (current user, login/logout targets)

mod model;
mod service;

// Re-export public API
pub use model::User;
pub use service::AuthService;
