//! Secret service implementation.
//!
//! Reads API keys from `secret.json`, falling back to environment variables
//! when the file doesn't provide a Gemini key.

use std::path::PathBuf;
use std::sync::Arc;

use journal_core::config::{GeminiConfig, SecretConfig};
use journal_core::error::{JournalError, Result};
use journal_core::secret::SecretService;
use tokio::sync::RwLock;

use crate::paths::JournalPaths;

/// Environment variables consulted, in order, for the Gemini key.
pub const GEMINI_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Service for reading secret configuration.
///
/// The file is read once and cached.
#[derive(Clone)]
pub struct SecretServiceImpl {
    secret_file: PathBuf,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    pub fn new(secret_file: PathBuf) -> Self {
        Self {
            secret_file,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_paths(paths: &JournalPaths) -> Result<Self> {
        let secret_file = paths
            .secret_file()
            .map_err(|e| JournalError::config(e.to_string()))?;
        Ok(Self::new(secret_file))
    }

    async fn read_file(&self) -> Result<SecretConfig> {
        match tokio::fs::read_to_string(&self.secret_file).await {
            Ok(content) if content.trim().is_empty() => Ok(SecretConfig::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SecretConfig::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Fills in a Gemini key from the environment when the file has none.
pub fn apply_env_fallback<F>(mut config: SecretConfig, lookup: F) -> SecretConfig
where
    F: Fn(&str) -> Option<String>,
{
    let has_key = config
        .gemini
        .as_ref()
        .is_some_and(|gemini| !gemini.api_key.trim().is_empty());
    if has_key {
        return config;
    }

    let from_env = GEMINI_KEY_ENV_VARS.iter().find_map(|name| {
        lookup(name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| (*name, value))
    });

    if let Some((name, api_key)) = from_env {
        tracing::debug!("[SecretService] Using Gemini key from ${}", name);
        let model_name = config.gemini.take().and_then(|gemini| gemini.model_name);
        config.gemini = Some(GeminiConfig {
            api_key,
            model_name,
        });
    }

    config
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> std::result::Result<SecretConfig, String> {
        if let Some(cached) = self.secrets.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let from_file = self.read_file().await.map_err(|e| {
            format!(
                "Failed to read {}: {}",
                self.secret_file.display(),
                e
            )
        })?;
        let loaded = apply_env_fallback(from_file, |name| std::env::var(name).ok());

        *self.secrets.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn secret_file_exists(&self) -> bool {
        tokio::fs::try_exists(&self.secret_file)
            .await
            .unwrap_or(false)
    }
}
