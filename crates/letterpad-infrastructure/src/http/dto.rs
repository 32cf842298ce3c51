//! Wire types of the letters backend.

use chrono::{DateTime, Utc};
use letterpad_core::{Document, SaveRequest};
use serde::{Deserialize, Serialize};

/// A letter as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub google_drive_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<LetterDto> for Document {
    fn from(dto: LetterDto) -> Self {
        Document {
            id: Some(dto.id),
            title: dto.title,
            body: dto.content,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            external_ref: dto.google_drive_id.filter(|r| !r.is_empty()),
            owner_id: dto.user_id,
        }
    }
}

/// Body of `POST /letters/save`.
#[derive(Debug, Serialize)]
pub struct SaveLetterRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub title: &'a str,
    pub content: &'a str,
}

impl<'a> From<&'a SaveRequest> for SaveLetterRequest<'a> {
    fn from(request: &'a SaveRequest) -> Self {
        Self {
            id: request.id.as_deref(),
            title: &request.title,
            content: &request.body,
        }
    }
}

/// Response of `POST /letters/save`.
#[derive(Debug, Deserialize)]
pub struct SaveLetterResponse {
    pub letter: LetterDto,
}

/// Error payload returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
