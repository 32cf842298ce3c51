//! Infrastructure layer for Letterpad.
//!
//! # Module Structure
//!
//! - `http`: REST gateway and auth service over `reqwest`
//! - `memory_gateway`: in-process gateway for offline mode and tests
//! - `config_service`: TOML configuration with environment overrides
//! - `notifier`: tracing and channel notifiers
//! - `static_auth`: fixed-session auth service
//! - `paths`: platform locations

pub mod config_service;
pub mod http;
pub mod memory_gateway;
pub mod notifier;
pub mod paths;
pub mod static_auth;

pub use config_service::ConfigService;
pub use http::{ApiClient, HttpAuthService, HttpDocumentGateway};
pub use memory_gateway::InMemoryDocumentGateway;
pub use notifier::{ChannelNotifier, TracingNotifier};
pub use paths::LetterpadPaths;
pub use static_auth::StaticAuthService;
