//! Gemini HTTP client
//!
//! The API key is passed per call rather than held by the client: it is read
//! from the secret store at the start of every run.

use super::{adapter, dto};
use crate::recognition::domain::{InlineImage, ServiceError};

/// Gemini `generateContent` client
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Endpoint URL without the key (safe to log)
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(prompt: &str, image: &InlineImage) -> dto::GenerateContentRequest {
        dto::GenerateContentRequest {
            contents: vec![dto::Content {
                parts: vec![
                    dto::Part {
                        text: Some(prompt.to_string()),
                        ..Default::default()
                    },
                    dto::Part {
                        inline_data: Some(dto::Blob {
                            mime_type: image.mime_type.to_string(),
                            data: image.data.clone(),
                        }),
                        ..Default::default()
                    },
                ],
                role: Some("user".to_string()),
            }],
        }
    }

    /// Send one prompt + image and return the model's raw text
    pub async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<String, ServiceError> {
        let endpoint = self.endpoint();
        tracing::debug!(
            "Gemini request: {} ({} base64 bytes, {})",
            endpoint,
            image.data.len(),
            image.mime_type
        );

        let response = self
            .http_client
            .post(&endpoint)
            .query(&[("key", api_key)])
            .json(&Self::build_request(prompt, image))
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<dto::ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body: message,
            });
        }

        let parsed = response
            .json::<dto::GenerateContentResponse>()
            .await
            .map_err(|e| ServiceError::Parse(e.without_url().to_string()))?;

        adapter::response_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_format() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            "https://generativelanguage.googleapis.com/v1beta",
            "gemini-1.5-pro",
        );
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_request_carries_prompt_then_image() {
        let image = InlineImage::from_bytes(b"\x89PNG\r\n");
        let request = GeminiClient::build_request("what album?", &image);
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text.as_deref(), Some("what album?"));
        let blob = parts[1].inline_data.as_ref().unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.data, image.data);
    }

    #[tokio::test]
    async fn test_network_error_does_not_leak_key() {
        let client = GeminiClient::new(reqwest::Client::new(), "http://127.0.0.1:9/v1beta", "m");
        let err = client
            .generate("super-secret-key", "p", &InlineImage::from_bytes(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)));
        assert!(!err.to_string().contains("super-secret-key"));
    }
}
