//! Album identification from a cover photo.
//!
//! The model is asked for a bare JSON object, but replies often wrap it in
//! prose or code fences. Only the first brace-delimited span is considered;
//! anything that does not match the two-field schema exactly is a failure.

use std::sync::Arc;

use serde::Deserialize;

use super::domain::{AlbumGuess, IdentifyError, InlineImage, StageError};
use super::traits::VisionModel;

/// Instruction sent alongside the photo
pub const ALBUM_PROMPT: &str = r#"
Analyze this album cover image and extract the following information:
- Album title
- Artist/band name

Be precise with the spelling and formatting of both the album title and artist name.
Return ONLY a valid JSON object with these fields:
{
  "albumTitle": "Title of the album",
  "artist": "Name of the artist or band"
}
"#;

const IDENTIFY_FAILED: &str = "Failed to identify album information from the image";

/// Exact shape the model must produce
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GuessSchema {
    album_title: String,
    artist: String,
}

/// Find the first `{...}` span in free text.
///
/// Starts at the leftmost `{` and stops where the brace depth returns to zero.
/// Braces inside JSON string literals are counted like any other brace.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;

    for (offset, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse the model's reply into a guess, or fail with an internal error.
pub fn parse_album_guess(text: &str) -> Result<AlbumGuess, IdentifyError> {
    let failed = || IdentifyError::Internal(IDENTIFY_FAILED.to_string());

    let Some(json) = extract_json_object(text) else {
        tracing::error!("No JSON object in model response: {:?}", truncate(text));
        return Err(failed());
    };

    let schema: GuessSchema = serde_json::from_str(json).map_err(|e| {
        tracing::error!("Failed to parse album information: {}", e);
        failed()
    })?;

    Ok(AlbumGuess {
        album_title: schema.album_title,
        artist: schema.artist,
    })
}

fn truncate(text: &str) -> String {
    text.chars().take(200).collect()
}

/// Turns photos into album guesses using a vision model
pub struct ImageIdentifier {
    model: Arc<dyn VisionModel>,
}

impl ImageIdentifier {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    /// One model call, one parse. A failed call comes back unclassified.
    pub async fn identify(&self, api_key: &str, image: &[u8]) -> Result<AlbumGuess, StageError> {
        let image = InlineImage::from_bytes(image);
        let text = self.model.generate(api_key, ALBUM_PROMPT, &image).await?;
        Ok(parse_album_guess(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::domain::ServiceError;
    use crate::recognition::traits::mocks::MockVision;

    #[test]
    fn test_extract_bare_object() {
        let text = r#"{"albumTitle":"X","artist":"Y"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_from_code_fence() {
        let text = "Sure! Here it is:\n```json\n{\"albumTitle\": \"Abbey Road\", \"artist\": \"The Beatles\"}\n```\nEnjoy.";
        assert_eq!(
            extract_json_object(text),
            Some("{\"albumTitle\": \"Abbey Road\", \"artist\": \"The Beatles\"}")
        );
    }

    #[test]
    fn test_extract_takes_leftmost_span() {
        let text = r#"noise {"a":1} more {"albumTitle":"X","artist":"Y"}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_extract_nested_and_unbalanced() {
        assert_eq!(extract_json_object("a {b {c} d} e"), Some("{b {c} d}"));
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("open { never closed"), None);
        assert_eq!(extract_json_object("} stray close first"), None);
    }

    #[test]
    fn test_extract_does_not_track_string_literals() {
        // The brace inside the value closes the span early
        let text = r#"{"albumTitle":"}","artist":"Y"}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"albumTitle":"}"#));
        assert!(parse_album_guess(text).is_err());
    }

    #[test]
    fn test_parse_valid_guess_keeps_strings_verbatim() {
        let guess =
            parse_album_guess(r#"Result: {"albumTitle": "  Rumours ", "artist": "Fleetwood Mac"}"#)
                .unwrap();
        assert_eq!(guess.album_title, "  Rumours ");
        assert_eq!(guess.artist, "Fleetwood Mac");
    }

    #[test]
    fn test_first_span_wins_even_if_later_one_is_valid() {
        let err = parse_album_guess(r#"noise {"a":1} more {"albumTitle":"X","artist":"Y"}"#)
            .unwrap_err();
        assert_eq!(err, IdentifyError::Internal(IDENTIFY_FAILED.to_string()));
    }

    #[test]
    fn test_schema_is_strict() {
        for text in [
            r#"{"albumTitle":"X"}"#,
            r#"{"albumTitle":"X","artist":"Y","year":1982}"#,
            r#"{"albumTitle":"X","artist":42}"#,
            r#"{"albumTitle":null,"artist":"Y"}"#,
            r#"{"album_title":"X","artist":"Y"}"#,
            "{not json}",
            "",
        ] {
            assert!(parse_album_guess(text).is_err(), "accepted: {}", text);
        }
    }

    #[tokio::test]
    async fn test_identify_parses_reply() {
        let identifier = ImageIdentifier::new(Arc::new(MockVision::replying(
            r#"{"albumTitle":"Thriller","artist":"Michael Jackson"}"#,
        )));
        let guess = identifier.identify("key", b"\xFF\xD8\xFF").await.unwrap();
        assert_eq!(guess.album_title, "Thriller");
    }

    #[tokio::test]
    async fn test_identify_model_failure_is_unclassified() {
        let identifier =
            ImageIdentifier::new(Arc::new(MockVision::failing(ServiceError::Network("reset".into()))));
        let err = identifier.identify("key", b"img").await.unwrap_err();
        assert!(matches!(err, StageError::Service(ServiceError::Network(_))));
    }

    #[tokio::test]
    async fn test_identify_bad_reply_is_internal() {
        let identifier = ImageIdentifier::new(Arc::new(MockVision::replying("I can't tell, sorry.")));
        let err = identifier.identify("key", b"img").await.unwrap_err();
        assert!(matches!(err, StageError::Classified(IdentifyError::Internal(_))));
    }
}
