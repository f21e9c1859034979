//! ConfigStore - Local Configuration Storage
//!
//! `AppConfig` persisted as TOML. The gateway token is encrypted on save and
//! decrypted on load; a token that does not decrypt is taken as plaintext so
//! hand-edited files keep working.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::config::AppConfig;
use crate::error::Result;
use crate::helpers::{decrypt_token, default_config_path, encrypt_token};

/// Config file location plus load/save
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config directory
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(default_config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, defaults when the file is absent or empty
    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            info!(path = ?self.path, "Config file not found, using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        let mut config: AppConfig = toml::from_str(&content).inspect_err(|e| {
            warn!(error = %e, path = ?self.path, "Failed to parse config file");
        })?;

        if let Some(stored) = config.gateway.token.take() {
            config.gateway.token = match decrypt_token(&stored) {
                Ok(token) => Some(token),
                Err(_) => Some(stored),
            };
        }

        info!(path = ?self.path, "Loaded config");
        Ok(config)
    }

    /// Save the config, encrypting the token
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let mut on_disk = config.clone();
        if let Some(token) = on_disk.gateway.token.take().filter(|t| !t.is_empty()) {
            on_disk.gateway.token = Some(encrypt_token(&token)?);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(&on_disk)?)?;
        info!(path = ?self.path, "Saved config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("config.toml"));
        assert_eq!(store.load().expect("loads"), AppConfig::default());
    }

    #[test]
    fn test_token_encrypted_at_rest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("nested").join("config.toml"));

        let mut config = AppConfig::default();
        config.gateway.token = Some("secret-token".to_string());
        config.polling.devices = 45;
        store.save(&config).expect("saves");

        let raw = fs::read_to_string(store.path()).expect("readable");
        assert!(!raw.contains("secret-token"));

        let loaded = store.load().expect("loads");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_plaintext_token_accepted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[gateway]\ntoken = \"hand-written\"\n").expect("writes");

        let loaded = ConfigStore::new(path).load().expect("loads");
        assert_eq!(loaded.gateway.token.as_deref(), Some("hand-written"));
    }
}
