//! Session-level document store.
//!
//! # Module Structure
//!
//! - `session_store`: `SessionStore` owning the Collection of the signed-in
//!   user, with `AuthState` and `StoreStatus` views

mod session_store;

pub use session_store::{AuthState, SessionStore, StoreStatus};
