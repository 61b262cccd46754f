//! Internal domain models for album recognition.
//!
//! These types are OUR types - they don't change when the vision model or the
//! catalog API change. Provider responses get converted into these via adapters.

use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

/// Incoming request for one pipeline invocation: a base64 encoded photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Base64 encoded image bytes, optionally with a `data:image/...;base64,` prefix
    pub image: String,
}

impl CaptureRequest {
    /// Build a request from raw image bytes (what the camera client does).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            image: general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode the payload back into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, IdentifyError> {
        let payload = strip_data_url_prefix(self.image.trim());

        let bytes = general_purpose::STANDARD.decode(payload).map_err(|e| {
            tracing::warn!("Rejected capture request: {}", e);
            IdentifyError::Internal("Invalid image payload".to_string())
        })?;

        if bytes.is_empty() {
            return Err(IdentifyError::Internal("Invalid image payload".to_string()));
        }
        Ok(bytes)
    }
}

/// Canvas captures arrive as `data:image/jpeg;base64,...`
fn strip_data_url_prefix(payload: &str) -> &str {
    if payload.starts_with("data:")
        && let Some((_, rest)) = payload.split_once(";base64,")
    {
        return rest;
    }
    payload
}

/// Title/artist pair read off the cover by the vision model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumGuess {
    pub album_title: String,
    pub artist: String,
}

/// Top search hit from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch {
    pub catalog_album_id: String,
    pub catalog_url: String,
    /// YYYY, YYYY-MM or YYYY-MM-DD depending on catalog precision
    pub release_date: Option<String>,
    pub track_count: Option<u32>,
}

/// Final success value: the guess merged with its catalog match.
///
/// Title and artist always come from the guess, never from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    pub album_title: String,
    pub artist: String,
    pub spotify_album_id: String,
    pub spotify_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tracks: Option<u32>,
}

impl IdentificationResult {
    pub fn merge(guess: AlbumGuess, found: CatalogMatch) -> Self {
        Self {
            album_title: guess.album_title,
            artist: guess.artist,
            spotify_album_id: found.catalog_album_id,
            spotify_url: found.catalog_url,
            release_date: found.release_date,
            total_tracks: found.track_count,
        }
    }
}

/// Short-lived catalog credential. Scoped to one invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Image bytes ready to send inline to the vision model
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: &'static str,
    /// Standard base64 of the image bytes
    pub data: String,
}

impl InlineImage {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            mime_type: sniff_mime_type(bytes),
            data: general_purpose::STANDARD.encode(bytes),
        }
    }
}

/// Guess the image media type from its magic bytes. Unknown formats are sent as JPEG.
fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}

/// Status updates streamed to the caller while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Analyzing,
    Identified { album_title: String, artist: String },
    Searching { album_title: String, artist: String },
    Found { album_id: String },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analyzing => write!(f, "🔍 Analyzing album cover..."),
            Self::Identified {
                album_title,
                artist,
            } => write!(f, "✅ Identified album: \"{}\" by {}", album_title, artist),
            Self::Searching {
                album_title,
                artist,
            } => write!(
                f,
                "🔎 Searching Spotify for \"{}\" by {}...",
                album_title, artist
            ),
            Self::Found { album_id } => write!(f, "✅ Found album on Spotify! ID: {}", album_id),
        }
    }
}

/// Item of a streamed invocation: any number of progress events, then one result.
#[derive(Debug, Clone)]
pub enum PipelineUpdate {
    Progress(ProgressEvent),
    Finished(Result<IdentificationResult, IdentifyError>),
}

/// Wire-level error code reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Internal,
    NotFound,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => f.write_str("INTERNAL"),
            Self::NotFound => f.write_str("NOT_FOUND"),
        }
    }
}

/// The only errors that cross the pipeline boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifyError {
    /// Contract violations, failed authentication, anything unexpected
    #[error("{0}")]
    Internal(String),

    /// The guessed album is not in the catalog, or searching failed
    #[error("{0}")]
    NotFound(String),

    /// A required secret is unset
    #[error("{0}")]
    Configuration(String),
}

impl IdentifyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Internal(_) | Self::Configuration(_) => ErrorCode::Internal,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Internal(m) | Self::NotFound(m) | Self::Configuration(m) => m,
        }
    }
}

/// Raw failures from an external service, before classification
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// What a pipeline stage can fail with: already classified, or raw.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Classified(#[from] IdentifyError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl StageError {
    /// Keep a classified error as-is, wrap anything else as internal.
    pub fn classify(self, fallback: &str) -> IdentifyError {
        match self {
            Self::Classified(e) => e,
            Self::Service(e) => {
                tracing::error!("{}: {}", fallback, e);
                IdentifyError::Internal(fallback.to_string())
            }
        }
    }
}
