//! Config file and secret diagnostics.

use std::path::Path;

use crate::config::{self, Config, ConfigError};
use crate::error::{Error, ResultExt};
use crate::secrets::{ConfigSecretStore, REQUIRED_SECRETS, SecretSource};

/// Report where config comes from and which secrets resolve
pub fn cmd_check_config(path: Option<&Path>, config: &Config) -> anyhow::Result<()> {
    println!("Checking configuration...\n");

    match path {
        Some(p) if p.exists() => println!("✓ Config file: {}", p.display()),
        Some(p) => println!("- Config file: {} (not found, using defaults)", p.display()),
        None => println!("- Config file: no config directory on this platform"),
    }
    println!();

    let store = ConfigSecretStore::new(config.credentials.clone());
    let mut missing = 0;
    for name in REQUIRED_SECRETS {
        match store.resolve(name) {
            Some((_, SecretSource::Environment)) => println!("✓ {} (environment)", name),
            Some((_, SecretSource::ConfigFile)) => println!("✓ {} (config file)", name),
            None => {
                println!("✗ {} not set", name);
                missing += 1;
            }
        }
    }

    println!();
    println!("  Vision model:  {} @ {}", config.vision.model, config.vision.base_url);
    println!("  Token URL:     {}", config.catalog.token_url);
    println!("  Catalog API:   {}", config.catalog.api_url);
    match config.http.timeout_secs {
        Some(secs) => println!("  HTTP timeout:  {}s", secs),
        None => println!("  HTTP timeout:  none"),
    }

    if missing > 0 {
        println!();
        println!("{} secret(s) missing. Identification will fail until they are set.", missing);
    }
    Ok(())
}

/// Write a default config file
pub fn cmd_init_config(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = path.ok_or(Error::Config(ConfigError::NoConfigDir))?;

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    config::save_to(&Config::default(), path)
        .map_err(Error::from)
        .with_context(format!("writing {}", path.display()))?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        cmd_init_config(Some(&path), false).unwrap();
        assert!(path.exists());

        assert!(cmd_init_config(Some(&path), false).is_err());
        assert!(cmd_init_config(Some(&path), true).is_ok());
    }

    #[test]
    fn test_init_config_without_dir() {
        let err = cmd_init_config(None, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Config(ConfigError::NoConfigDir))
        ));
        assert!(err.to_string().contains("config directory"));
    }

    #[test]
    fn test_init_config_write_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("config.toml");

        let err = cmd_init_config(Some(&path), false).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("writing "), "{}", msg);
        assert!(msg.contains("config.toml"));
    }
}
