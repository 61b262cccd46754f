//! Spotify API Data Transfer Objects
//!
//! These types match what the Spotify Web API returns.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! Example search response (`type=album&limit=1`):
//! ```json
//! {
//!   "albums": {
//!     "items": [{
//!       "id": "2ANVost0y2y52ema1E9xAZ",
//!       "name": "Thriller",
//!       "external_urls": { "spotify": "https://open.spotify.com/album/2ANVost0y2y52ema1E9xAZ" },
//!       "release_date": "1982-11-30",
//!       "total_tracks": 9
//!     }]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Client-credentials grant response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    /// Lifetime in seconds
    pub expires_in: Option<u64>,
}

/// Top-level search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub albums: AlbumPage,
}

/// Paging object wrapping album results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumPage {
    #[serde(default)]
    pub items: Vec<Album>,
    pub total: Option<u32>,
}

/// Simplified album object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Album {
    pub id: String,
    pub name: Option<String>,
    pub external_urls: ExternalUrls,
    pub release_date: Option<String>,
    pub total_tracks: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalUrls {
    pub spotify: String,
}
