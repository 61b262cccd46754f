//! Spotify catalog search client
//!
//! Searches with field filters (`album:` and `artist:`) rather than a bare
//! keyword query, and asks for one result only.

use super::{adapter, dto};
use crate::http::status_error;
use crate::recognition::domain::{BearerToken, CatalogMatch, IdentifyError, ServiceError};

/// Url-encoded `q` parameter for an album search
pub fn search_query(album_title: &str, artist: &str) -> String {
    urlencoding::encode(&format!("album:{} artist:{}", album_title, artist)).into_owned()
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Full search URL for a title/artist pair
    fn search_url(&self, album_title: &str, artist: &str) -> String {
        format!(
            "{}/search?q={}&type=album&limit=1",
            self.base_url,
            search_query(album_title, artist)
        )
    }

    /// Find the album on Spotify.
    ///
    /// Every failure is reported as not found: an empty result names the
    /// album, anything else gets a generic message.
    pub async fn search_album(
        &self,
        album_title: &str,
        artist: &str,
        token: &BearerToken,
    ) -> Result<CatalogMatch, IdentifyError> {
        let response = self
            .send_search_request(album_title, artist, token)
            .await
            .map_err(|e| {
                tracing::error!("Spotify search error: {}", e);
                IdentifyError::NotFound("Error searching for album on Spotify".to_string())
            })?;

        adapter::to_catalog_match(response).ok_or_else(|| {
            tracing::warn!("No Spotify results for {:?} by {:?}", album_title, artist);
            IdentifyError::NotFound(format!(
                "Could not find album \"{}\" by \"{}\" on Spotify",
                album_title, artist
            ))
        })
    }

    async fn send_search_request(
        &self,
        album_title: &str,
        artist: &str,
        token: &BearerToken,
    ) -> Result<dto::SearchResponse, ServiceError> {
        let url = self.search_url(album_title, artist);
        tracing::debug!("Spotify search: {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }
}
