//! Shared HTTP client construction.

use std::time::Duration;

use crate::config::HttpConfig;
use crate::recognition::ServiceError;

/// User agent sent to every upstream service
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build the client shared by the vision model and catalog collaborators.
///
/// The timeout is only applied when configured; otherwise requests run until
/// the transport gives up.
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, ServiceError> {
    let mut builder = reqwest::Client::builder()
        .gzip(true)
        .user_agent(USER_AGENT);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| ServiceError::Client(e.to_string()))
}

/// Turn a non-2xx response into a [`ServiceError::Http`], keeping a short body excerpt
pub async fn status_error(response: reqwest::Response) -> ServiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ServiceError::Http {
        status: status.as_u16(),
        body: body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("snap-and-play/"));
    }

    #[test]
    fn test_build_with_and_without_timeout() {
        assert!(build_client(&HttpConfig::default()).is_ok());
        assert!(build_client(&HttpConfig { timeout_secs: Some(5) }).is_ok());
    }
}
