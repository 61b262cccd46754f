//! Album recognition - identifies an album from a cover photo and resolves it
//! to a canonical Spotify record.
//!
//! # Architecture
//!
//! Same layering for each external service:
//! - **Domain models** (`domain.rs`) - our types and the error taxonomy
//! - **API DTOs** (`gemini/dto.rs`, `spotify/dto.rs`) - exact wire shapes
//! - **Adapters** - convert DTOs to domain models
//! - **Clients** - HTTP clients for the external APIs
//! - **Traits** - seams for dependency injection and mocking
//! - **Identifier** - prompt + defensive parsing of the model reply
//! - **Pipeline** - sequences the stages and classifies every failure
//!
//! # Usage
//!
//! ```ignore
//! use snap_and_play::recognition::{CaptureRequest, IdentificationPipeline};
//!
//! let pipeline = IdentificationPipeline::from_config(&config::load())?;
//! let request = CaptureRequest::from_bytes(&std::fs::read("cover.jpg")?);
//! let result = pipeline
//!     .find_album(&request, |event| eprintln!("{}", event))
//!     .await?;
//! println!("{} by {}: {}", result.album_title, result.artist, result.spotify_url);
//! ```

pub mod domain;
pub mod gemini;
pub mod identifier;
pub mod pipeline;
pub mod spotify;
pub mod traits;

pub use domain::{
    AlbumGuess, BearerToken, CaptureRequest, CatalogMatch, ErrorCode, IdentificationResult,
    IdentifyError, InlineImage, PipelineUpdate, ProgressEvent, ServiceError, StageError,
};
pub use pipeline::IdentificationPipeline;
