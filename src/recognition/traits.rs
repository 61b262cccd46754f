//! Trait definitions for the pipeline's external collaborators.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! substitute the mocks below.
//!
//! The vision model returns raw [`ServiceError`]s: turning its text into an
//! album guess is the identifier's job. The catalog seams return
//! [`StageError`] so implementations can report already-classified failures.

use async_trait::async_trait;

use super::domain::{BearerToken, CatalogMatch, InlineImage, ServiceError, StageError};

/// Vision-capable text generation.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Send a prompt plus an inline image and return the model's free text.
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<String, ServiceError>;
}

/// OAuth client-credentials exchange.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn exchange_client_credentials(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<BearerToken, StageError>;
}

/// Catalog album search.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Resolve a title/artist pair to the catalog's top hit.
    async fn search_album(
        &self,
        album_title: &str,
        artist: &str,
        token: &BearerToken,
    ) -> Result<CatalogMatch, StageError>;
}

// Implement traits for real clients

#[async_trait]
impl VisionModel for super::gemini::GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<String, ServiceError> {
        self.generate(api_key, prompt, image).await
    }
}

#[async_trait]
impl TokenExchanger for super::spotify::SpotifyAuthClient {
    async fn exchange_client_credentials(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<BearerToken, StageError> {
        Ok(self
            .exchange_client_credentials(client_id, client_secret)
            .await?)
    }
}

#[async_trait]
impl CatalogSearch for super::spotify::SpotifyClient {
    async fn search_album(
        &self,
        album_title: &str,
        artist: &str,
        token: &BearerToken,
    ) -> Result<CatalogMatch, StageError> {
        Ok(self.search_album(album_title, artist, token).await?)
    }
}
