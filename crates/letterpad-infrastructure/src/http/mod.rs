//! HTTP implementations of the gateway and auth contracts.
//!
//! # Endpoints
//!
//! | Call | Request |
//! |---|---|
//! | list | `GET /letters` |
//! | get | `GET /letters/{id}` |
//! | save | `POST /letters/save` |
//! | delete | `DELETE /letters/{id}` |
//! | current user | `GET /auth/user` |

mod auth_service;
mod client;
mod document_gateway;
mod dto;

pub use auth_service::HttpAuthService;
pub use client::{ApiClient, status_error};
pub use document_gateway::HttpDocumentGateway;
pub use dto::{ErrorBody, LetterDto, SaveLetterRequest, SaveLetterResponse};
