//! Identification pipeline - orchestrates photo -> guess -> catalog match
//!
//! Strictly linear:
//! 1. Ask the vision model what album the photo shows
//! 2. Exchange catalog credentials for a fresh bearer token
//! 3. Search the catalog for the guessed title/artist
//!
//! Progress is reported after each step. Every failure leaving this module is
//! one of the [`IdentifyError`] kinds; nothing is retried.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::recognition::{
    domain::{
        AlbumGuess, CaptureRequest, CatalogMatch, IdentificationResult, IdentifyError,
        PipelineUpdate, ProgressEvent, ServiceError, StageError,
    },
    gemini::GeminiClient,
    identifier::ImageIdentifier,
    spotify::{SpotifyAuthClient, SpotifyClient},
    traits::{CatalogSearch, TokenExchanger, VisionModel},
};
use crate::secrets::{self, ConfigSecretStore, SecretStore};

const ANALYSIS_UNHANDLED: &str = "Unhandled error in album analysis";
const SEARCH_UNHANDLED: &str = "Unhandled error while searching Spotify";

/// End-to-end album identification
pub struct IdentificationPipeline {
    secrets: Arc<dyn SecretStore>,
    identifier: ImageIdentifier,
    tokens: Arc<dyn TokenExchanger>,
    catalog: Arc<dyn CatalogSearch>,
}

impl IdentificationPipeline {
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        vision: Arc<dyn VisionModel>,
        tokens: Arc<dyn TokenExchanger>,
        catalog: Arc<dyn CatalogSearch>,
    ) -> Self {
        Self {
            secrets,
            identifier: ImageIdentifier::new(vision),
            tokens,
            catalog,
        }
    }

    /// Wire the real Gemini and Spotify clients around one shared HTTP client
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let http = crate::http::build_client(&config.http)?;

        Ok(Self::new(
            Arc::new(ConfigSecretStore::new(config.credentials.clone())),
            Arc::new(GeminiClient::new(
                http.clone(),
                &config.vision.base_url,
                &config.vision.model,
            )),
            Arc::new(SpotifyAuthClient::new(http.clone(), &config.catalog.token_url)),
            Arc::new(SpotifyClient::new(http, &config.catalog.api_url)),
        ))
    }

    /// Decode a capture request and run the pipeline on it
    pub async fn find_album(
        &self,
        request: &CaptureRequest,
        on_progress: impl FnMut(ProgressEvent) + Send,
    ) -> Result<IdentificationResult, IdentifyError> {
        let image = request.decode()?;
        self.run(&image, on_progress).await
    }

    /// Run one invocation on raw image bytes.
    ///
    /// Events arrive in order: analyzing, identified, searching, found. None
    /// are emitted after a failure.
    pub async fn run(
        &self,
        image: &[u8],
        mut on_progress: impl FnMut(ProgressEvent) + Send,
    ) -> Result<IdentificationResult, IdentifyError> {
        tracing::info!("Processing album cover image ({} bytes)", image.len());
        on_progress(ProgressEvent::Analyzing);

        let guess = self.analyze(image).await?;
        tracing::info!("Album identified: {} by {}", guess.album_title, guess.artist);
        on_progress(ProgressEvent::Identified {
            album_title: guess.album_title.clone(),
            artist: guess.artist.clone(),
        });

        on_progress(ProgressEvent::Searching {
            album_title: guess.album_title.clone(),
            artist: guess.artist.clone(),
        });
        let found = self
            .resolve(&guess)
            .await
            .map_err(|e| e.classify(SEARCH_UNHANDLED))?;
        tracing::info!("Found album on Spotify! ID: {}", found.catalog_album_id);
        on_progress(ProgressEvent::Found {
            album_id: found.catalog_album_id.clone(),
        });

        Ok(IdentificationResult::merge(guess, found))
    }

    /// Run on the tokio runtime, streaming progress and then the result.
    ///
    /// The receiver yields zero or more `Progress` items followed by exactly
    /// one `Finished`. Dropping it does not cancel the run.
    pub fn spawn(self: Arc<Self>, request: CaptureRequest) -> mpsc::UnboundedReceiver<PipelineUpdate> {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let result = self
                .find_album(&request, move |event| {
                    let _ = progress_tx.send(PipelineUpdate::Progress(event));
                })
                .await;
            let _ = tx.send(PipelineUpdate::Finished(result));
        });

        rx
    }

    async fn analyze(&self, image: &[u8]) -> Result<AlbumGuess, IdentifyError> {
        let api_key = self.secrets.get_secret(secrets::GOOGLE_API_KEY)?;
        self.identifier
            .identify(&api_key, image)
            .await
            .map_err(|e| e.classify(ANALYSIS_UNHANDLED))
    }

    async fn resolve(&self, guess: &AlbumGuess) -> Result<CatalogMatch, StageError> {
        let client_id = self.secrets.get_secret(secrets::SPOTIFY_CLIENT_ID)?;
        let client_secret = self.secrets.get_secret(secrets::SPOTIFY_CLIENT_SECRET)?;

        let token = self
            .tokens
            .exchange_client_credentials(&client_id, &client_secret)
            .await?;

        self.catalog
            .search_album(&guess.album_title, &guess.artist, &token)
            .await
    }
}
