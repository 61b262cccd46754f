//! Album identification command.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::{self, Error, ResultExt};
use crate::recognition::{
    CaptureRequest, ErrorCode, IdentificationPipeline, IdentificationResult, IdentifyError,
    PipelineUpdate,
};

/// Error body printed with `--json`
#[derive(Serialize)]
struct ErrorBody<'a> {
    code: ErrorCode,
    message: &'a str,
}

/// Identify an album and print the result
pub fn cmd_identify(
    rt: &Runtime,
    config: &Config,
    image: Option<&Path>,
    request: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let capture = load_capture(image, request)?;
    let pipeline = IdentificationPipeline::from_config(config)
        .map_err(Error::from)
        .with_context("setting up HTTP client")?;
    let pipeline = Arc::new(pipeline);

    let outcome = rt.block_on(async {
        let mut updates = pipeline.spawn(capture);
        let mut outcome = None;
        while let Some(update) = updates.recv().await {
            match update {
                PipelineUpdate::Progress(event) => eprintln!("{}", event),
                PipelineUpdate::Finished(result) => outcome = Some(result),
            }
        }
        outcome
    });

    let Some(result) = outcome else {
        anyhow::bail!("Identification ended without a result");
    };

    match result {
        Ok(found) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                print_result(&found);
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!("{}", render_error(&e)?);
            } else {
                eprintln!("{}", describe_error(&Error::from(e)));
            }
            std::process::exit(1);
        }
    }
}

/// Build the capture request from a photo or a JSON request file
fn load_capture(image: Option<&Path>, request: Option<&Path>) -> error::Result<CaptureRequest> {
    match (image, request) {
        (Some(path), _) => {
            if !path.exists() {
                return Err(Error::not_found(path));
            }
            let bytes = std::fs::read(path).with_context(format!("reading {}", path.display()))?;
            Ok(CaptureRequest::from_bytes(&bytes))
        }
        (None, Some(path)) => {
            let body = if path == Path::new("-") {
                let mut body = String::new();
                std::io::stdin()
                    .read_to_string(&mut body)
                    .with_context("reading request from stdin")?;
                body
            } else {
                std::fs::read_to_string(path).with_context(format!("reading {}", path.display()))?
            };
            parse_request(&body)
        }
        (None, None) => Err(Error::invalid_request("no image or request given")),
    }
}

fn parse_request(body: &str) -> error::Result<CaptureRequest> {
    serde_json::from_str::<CaptureRequest>(body).with_context("parsing capture request")
}

fn render_error(error: &IdentifyError) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ErrorBody {
        code: error.code(),
        message: error.message(),
    })
}

fn print_result(found: &IdentificationResult) {
    println!();
    println!("✓ Album found!");
    println!();
    println!("  Title:    {}", found.album_title);
    println!("  Artist:   {}", found.artist);
    if let Some(date) = &found.release_date {
        println!("  Released: {}", date);
    }
    if let Some(tracks) = found.total_tracks {
        println!("  Tracks:   {}", tracks);
    }
    println!();
    println!("  Spotify: {}", found.spotify_url);
}

/// Human-readable failure, printed to stderr alongside progress
fn describe_error(error: &Error) -> String {
    let hint = match error {
        Error::Identify(IdentifyError::NotFound(_)) => {
            "\n  Try retaking the photo with the cover filling the frame."
        }
        Error::Identify(IdentifyError::Configuration(_)) => {
            "\n  Set it in the environment or run `snap-and-play check-config`."
        }
        _ => "",
    };
    format!("✗ {}{}", error, hint)
}
