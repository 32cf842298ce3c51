//! Document domain model.

use super::text::{TextStats, plain_text};
use crate::error::{LetterError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const EXTERNAL_DOCUMENT_BASE: &str = "https://docs.google.com/document/d/";

/// A single letter with its persistence metadata.
///
/// `created_at`, `updated_at`, `external_ref` and `owner_id` are assigned by
/// the persistence gateway and passed through untouched; the client never
/// sets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Server identifier. `None` means the document was never saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Title. May be empty while editing, never once saved.
    pub title: String,
    /// Opaque formatted-text payload (HTML markup).
    pub body: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Reference to a linked external artifact (read-only).
    #[serde(default)]
    pub external_ref: Option<String>,
    /// Owning user (read-only).
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl Document {
    /// Creates an unsaved document.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Returns true once the gateway has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Plain-text projection of the body.
    pub fn plain_text(&self) -> String {
        plain_text(&self.body)
    }

    /// Word and character counters for the body.
    pub fn stats(&self) -> TextStats {
        TextStats::from_markup(&self.body)
    }

    /// Returns the first `limit` characters of the plain-text body,
    /// followed by `...` when the text was cut.
    pub fn preview(&self, limit: usize) -> String {
        let text = self.plain_text();
        let mut chars = text.chars();
        let head: String = chars.by_ref().take(limit).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    /// Link to the linked Google Docs copy, if the letter has one.
    pub fn external_url(&self) -> Option<String> {
        self.external_ref
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| format!("{EXTERNAL_DOCUMENT_BASE}{r}"))
    }

    /// Builds the payload that persists the current title and body.
    pub fn save_request(&self) -> SaveRequest {
        SaveRequest::new(self.id.clone(), self.title.clone(), self.body.clone())
    }
}

/// Payload sent to the persistence gateway.
///
/// An `id` turns the save into an update, otherwise it creates a new
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub body: String,
}

impl SaveRequest {
    pub fn new(id: Option<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Returns true when the request updates an existing document.
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }

    /// Checks the save precondition.
    ///
    /// The title is trimmed for validation only; the stored title keeps
    /// its whitespace.
    ///
    /// # Errors
    ///
    /// Returns `LetterError::ValidationFailed` when the trimmed title is empty.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(LetterError::validation("Please add a title"));
        }
        Ok(())
    }
}
