//! Shared HTTP plumbing for the letters backend.
//!
//! Builds endpoint URLs according to the configured transport mode,
//! attaches credentials, and maps HTTP statuses onto `LetterError`.

use super::dto::ErrorBody;
use letterpad_core::config::{GatewaySettings, TransportMode};
use letterpad_core::error::{LetterError, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Thin wrapper around `reqwest::Client` bound to one backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    transport: TransportMode,
    proxy_prefix: String,
    access_token: Option<String>,
}

impl ApiClient {
    /// Creates a client from the gateway settings.
    ///
    /// A cookie store is enabled so session cookies set by the backend are
    /// sent back on later requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(settings: &GatewaySettings) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            transport: settings.transport,
            proxy_prefix: settings.proxy_prefix.clone(),
            access_token: settings.access_token.clone(),
        })
    }

    /// URL of a backend path as the browser would see it (never proxied).
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL actually requested for a backend path.
    pub fn endpoint(&self, path: &str) -> String {
        let target = self.public_url(path);
        match self.transport {
            TransportMode::Direct => target,
            TransportMode::Proxy => format!("{}{}", self.proxy_prefix, target),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.access_token {
            request.header("Authorization", format!("Bearer {}", token))
        } else {
            request
        }
    }

    /// Sends `GET path` and decodes the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T> {
        let request = self.client.get(self.endpoint(path));
        let response = self.execute(request, resource).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends `POST path` with a JSON body and decodes the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B, resource: &str) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.endpoint(path)).json(body);
        let response = self.execute(request, resource).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends `DELETE path`, ignoring the response body.
    pub async fn delete(&self, path: &str, resource: &str) -> Result<()> {
        let request = self.client.delete(self.endpoint(path));
        self.execute(request, resource).await?;
        Ok(())
    }

    async fn execute(&self, request: RequestBuilder, resource: &str) -> Result<Response> {
        let response = self
            .authorize(request)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| LetterError::request_failed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = status_error(status, &text, resource);
        tracing::warn!("[ApiClient] {} -> {} ({})", resource, status, err);
        Err(err)
    }
}

/// Maps a non-success status and its body onto the error taxonomy.
pub fn status_error(status: StatusCode, body: &str, resource: &str) -> LetterError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| "API request failed".to_string());

    match status {
        StatusCode::UNAUTHORIZED => LetterError::Unauthorized,
        StatusCode::NOT_FOUND => LetterError::not_found("Document", resource),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            LetterError::validation(message)
        }
        _ => LetterError::request_failed(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(transport: TransportMode) -> GatewaySettings {
        GatewaySettings {
            base_url: "https://api.example/".to_string(),
            transport,
            proxy_prefix: "https://proxy.example/?".to_string(),
            ..GatewaySettings::default()
        }
    }

    #[test]
    fn test_direct_endpoint() {
        let client = ApiClient::new(&settings(TransportMode::Direct)).unwrap();
        assert_eq!(client.endpoint("/letters"), "https://api.example/letters");
    }

    #[test]
    fn test_proxied_endpoint_keeps_public_url() {
        let client = ApiClient::new(&settings(TransportMode::Proxy)).unwrap();
        assert_eq!(
            client.endpoint("/letters/1"),
            "https://proxy.example/?https://api.example/letters/1"
        );
        assert_eq!(client.public_url("/auth/google"), "https://api.example/auth/google");
    }

    #[tokio::test]
    async fn test_transport_error_prefixed_once() {
        let client = ApiClient::new(&GatewaySettings {
            base_url: "http://127.0.0.1:1".to_string(),
            ..GatewaySettings::default()
        })
        .unwrap();

        let err = client
            .get_json::<serde_json::Value>("/letters", "letters")
            .await
            .unwrap_err();
        assert!(err.is_request_failed());
        assert_eq!(err.to_string().matches("Request failed:").count(), 1);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_error(StatusCode::UNAUTHORIZED, "", "x"), LetterError::Unauthorized);
        assert!(status_error(StatusCode::NOT_FOUND, "", "abc").is_not_found());
        assert_eq!(
            status_error(StatusCode::BAD_REQUEST, r#"{"error":"Title is required"}"#, "save"),
            LetterError::validation("Title is required")
        );
        assert_eq!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>", "save"),
            LetterError::request_failed("API request failed")
        );
    }
}
