//! Unified path management for journal configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/mindful-journal/   # Config directory (or the base override)
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! ├── store/                   # Local key-value scope (local backend)
//! │   ├── mindful_journal_entries.json
//! │   └── mindful_journal_chat.json
//! └── logs/                    # Application logs
//!     └── mindful-journal.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use journal_core::config::{GeminiConfig, SecretConfig};

const APP_DIR_NAME: &str = "mindful-journal";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves every file location of the application.
///
/// With no base directory the platform config directory is used
/// (`dirs::config_dir()/mindful-journal`). A base directory replaces that
/// root entirely, which is what tests and `JOURNAL_HOME` rely on.
#[derive(Debug, Clone, Default)]
pub struct JournalPaths {
    base_dir: Option<PathBuf>,
}

impl JournalPaths {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the root directory of all journal files.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Returns the default scope directory of the local key-value store.
    pub fn store_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("store"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    /// Ensures the secret file exists, creating a template if it doesn't.
    ///
    /// The template is written with 600 permissions on Unix.
    pub fn ensure_secret_file(&self) -> Result<PathBuf, std::io::Error> {
        let secret_path = self
            .secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template_config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: None,
            }),
        };

        let template_json = serde_json::to_string_pretty(&template_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}
