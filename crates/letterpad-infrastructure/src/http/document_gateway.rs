//! `DocumentGateway` over the letters REST API.

use super::client::ApiClient;
use super::dto::{LetterDto, SaveLetterRequest, SaveLetterResponse};
use async_trait::async_trait;
use letterpad_core::error::Result;
use letterpad_core::{Document, DocumentGateway, SaveRequest};

/// Persistence gateway backed by the letters backend.
#[derive(Debug, Clone)]
pub struct HttpDocumentGateway {
    client: ApiClient,
}

impl HttpDocumentGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentGateway for HttpDocumentGateway {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        tracing::debug!("[HttpDocumentGateway] list_documents");
        let letters: Vec<LetterDto> = self.client.get_json("/letters", "letters").await?;
        Ok(letters.into_iter().map(Document::from).collect())
    }

    async fn get_document(&self, id: &str) -> Result<Document> {
        tracing::debug!("[HttpDocumentGateway] get_document id={}", id);
        let letter: LetterDto = self.client.get_json(&letter_path(id), id).await?;
        Ok(letter.into())
    }

    async fn save_document(&self, request: &SaveRequest) -> Result<Document> {
        tracing::debug!(
            "[HttpDocumentGateway] save_document id={:?}, title_len={}, body_len={}",
            request.id,
            request.title.len(),
            request.body.len()
        );
        let body = SaveLetterRequest::from(request);
        let resource = request.id.as_deref().unwrap_or("new letter");
        let response: SaveLetterResponse = self
            .client
            .post_json("/letters/save", &body, resource)
            .await?;
        Ok(response.letter.into())
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        tracing::debug!("[HttpDocumentGateway] delete_document id={}", id);
        self.client.delete(&letter_path(id), id).await
    }
}

/// Path of one letter, with the id encoded as a single segment.
fn letter_path(id: &str) -> String {
    format!("/letters/{}", urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_path_encodes_id() {
        assert_eq!(letter_path("65f0c2"), "/letters/65f0c2");
        assert_eq!(letter_path("a/b?c#d"), "/letters/a%2Fb%3Fc%23d");
        assert_eq!(letter_path("x y"), "/letters/x%20y");
    }
}
