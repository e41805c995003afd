//! Configuration service implementation.
//!
//! Loads the application configuration from `config.toml` in the journal
//! config directory.

use std::path::{Path, PathBuf};

use journal_core::config::JournalConfig;
use journal_core::error::{JournalError, Result};

use crate::paths::JournalPaths;
use crate::storage::AtomicFile;

/// Loads [`JournalConfig`] from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicFile,
}

impl ConfigService {
    pub fn new(config_file: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(config_file),
        }
    }

    /// Uses `config.toml` under the given base directory (or the platform default).
    pub fn from_paths(paths: &JournalPaths) -> Result<Self> {
        let config_file = paths
            .config_file()
            .map_err(|e| JournalError::config(e.to_string()))?;
        Ok(Self::new(config_file))
    }

    pub fn config_path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the configuration.
    ///
    /// A missing file yields the defaults, which are also written out so the
    /// user has something to edit; failing to write them is only logged.
    /// A file that exists but doesn't parse is an error.
    pub fn load(&self) -> Result<JournalConfig> {
        match self.file.load()? {
            Some(content) => {
                let config: JournalConfig = toml::from_str(&content).map_err(|e| {
                    JournalError::config(format!(
                        "Failed to parse {}: {}",
                        self.file.path().display(),
                        e
                    ))
                })?;
                tracing::debug!(
                    "[ConfigService] Loaded configuration from {}",
                    self.file.path().display()
                );
                Ok(config)
            }
            None => {
                let config = JournalConfig::default();
                if let Err(e) = self.save(&config) {
                    tracing::warn!(
                        "[ConfigService] Could not write default configuration to {}: {}",
                        self.file.path().display(),
                        e
                    );
                }
                Ok(config)
            }
        }
    }

    pub fn save(&self, config: &JournalConfig) -> Result<()> {
        let content = toml::to_string_pretty(config)?;
        self.file.save(&content)
    }
}
