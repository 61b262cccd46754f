//! Client-credentials token exchange against the Spotify accounts service.
//!
//! Every failure here means the catalog is unusable for this run, so all of
//! them collapse into a single internal error. No retries, no token cache.

use base64::{Engine as _, engine::general_purpose};

use super::dto;
use crate::http::status_error;
use crate::recognition::domain::{BearerToken, IdentifyError, ServiceError};

const AUTH_FAILED: &str = "Failed to authenticate with Spotify API";

/// `Authorization` header value for the client-credentials grant
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let raw = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", general_purpose::STANDARD.encode(raw))
}

/// Spotify accounts (token endpoint) client
pub struct SpotifyAuthClient {
    http_client: reqwest::Client,
    token_url: String,
}

impl SpotifyAuthClient {
    pub fn new(http_client: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            http_client,
            token_url: token_url.into(),
        }
    }

    /// Exchange client id/secret for a short-lived bearer token
    pub async fn exchange_client_credentials(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<BearerToken, IdentifyError> {
        match self.send_token_request(client_id, client_secret).await {
            Ok(token) => {
                tracing::debug!(
                    "Obtained Spotify token (expires in {:?}s)",
                    token.expires_in
                );
                Ok(BearerToken::new(token.access_token))
            }
            Err(e) => {
                tracing::error!("Failed to get Spotify token: {}", e);
                Err(IdentifyError::Internal(AUTH_FAILED.to_string()))
            }
        }
    }

    async fn send_token_request(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<dto::TokenResponse, ServiceError> {
        let response = self
            .http_client
            .post(&self.token_url)
            .header(
                reqwest::header::AUTHORIZATION,
                basic_auth_header(client_id, client_secret),
            )
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        response
            .json::<dto::TokenResponse>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::serve_once;

    #[test]
    fn test_basic_auth_header() {
        // base64("client:secret")
        assert_eq!(
            basic_auth_header("client", "secret"),
            "Basic Y2xpZW50OnNlY3JldA=="
        );
    }

    #[test]
    fn test_client_keeps_token_url() {
        let client = SpotifyAuthClient::new(reqwest::Client::new(), "http://localhost:9/token");
        assert_eq!(client.token_url, "http://localhost:9/token");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_auth_failure() {
        // Port 9 (discard) on localhost refuses connections
        let client = SpotifyAuthClient::new(reqwest::Client::new(), "http://127.0.0.1:9/api/token");
        let err = client
            .exchange_client_credentials("id", "secret")
            .await
            .unwrap_err();
        assert_eq!(err, IdentifyError::Internal(AUTH_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_exchange_sends_basic_auth_and_grant() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"access_token":"tok","token_type":"Bearer","expires_in":3600}"#,
        );
        let client = SpotifyAuthClient::new(reqwest::Client::new(), format!("{}/api/token", base));

        let token = client.exchange_client_credentials("id", "secret").await.unwrap();
        assert_eq!(token.as_str(), "tok");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/token "));
        // base64("id:secret")
        assert!(request.contains("Basic aWQ6c2VjcmV0"));
        assert!(
            request
                .to_lowercase()
                .contains("content-type: application/x-www-form-urlencoded")
        );
        assert!(request.ends_with("grant_type=client_credentials"));
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_auth_failure() {
        let (base, server) = serve_once("401 Unauthorized", r#"{"error":"invalid_client"}"#);
        let client = SpotifyAuthClient::new(reqwest::Client::new(), format!("{}/api/token", base));

        let err = client
            .exchange_client_credentials("id", "wrong")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            IdentifyError::Internal("Failed to authenticate with Spotify API".to_string())
        );
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_malformed_token_body_is_auth_failure() {
        let (base, server) = serve_once("200 OK", r#"{"token_type":"Bearer"}"#);
        let client = SpotifyAuthClient::new(reqwest::Client::new(), format!("{}/api/token", base));

        let err = client
            .exchange_client_credentials("id", "secret")
            .await
            .unwrap_err();
        assert_eq!(err, IdentifyError::Internal(AUTH_FAILED.to_string()));
        server.join().unwrap();
    }
}
