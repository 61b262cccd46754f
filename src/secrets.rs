//! Secret lookup for the three credentials a run needs.
//!
//! Lookup is by name. The environment wins over the config file so deployments
//! can inject secrets without touching disk.

use crate::config::Credentials;
use crate::recognition::IdentifyError;

/// Vision model API key
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Catalog client id
pub const SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
/// Catalog client secret
pub const SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";

/// Every secret a full run reads, in the order it reads them
pub const REQUIRED_SECRETS: [&str; 3] = [GOOGLE_API_KEY, SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET];

/// Read-only named secret lookup.
pub trait SecretStore: Send + Sync {
    /// Fails with [`IdentifyError::Configuration`] when the secret is unset.
    fn get_secret(&self, name: &str) -> Result<String, IdentifyError>;
}

/// Where a resolved secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Environment,
    ConfigFile,
}

/// Secrets from the environment, falling back to `[credentials]`
#[derive(Debug, Clone, Default)]
pub struct ConfigSecretStore {
    credentials: Credentials,
}

impl ConfigSecretStore {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Resolve a secret and report where it was found.
    pub fn resolve(&self, name: &str) -> Option<(String, SecretSource)> {
        if let Some(value) = non_empty(std::env::var(name).ok()) {
            return Some((value, SecretSource::Environment));
        }
        non_empty(self.from_config(name)).map(|v| (v, SecretSource::ConfigFile))
    }

    fn from_config(&self, name: &str) -> Option<String> {
        match name {
            GOOGLE_API_KEY => self.credentials.google_api_key.clone(),
            SPOTIFY_CLIENT_ID => self.credentials.spotify_client_id.clone(),
            SPOTIFY_CLIENT_SECRET => self.credentials.spotify_client_secret.clone(),
            _ => None,
        }
    }
}

impl SecretStore for ConfigSecretStore {
    fn get_secret(&self, name: &str) -> Result<String, IdentifyError> {
        self.resolve(name).map(|(value, _)| value).ok_or_else(|| {
            tracing::error!("Secret {} is not configured", name);
            IdentifyError::Configuration(format!("Missing required secret: {}", name))
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
