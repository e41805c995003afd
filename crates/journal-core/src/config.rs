//! Configuration models.
//!
//! `JournalConfig` is read from `config.toml`; `SecretConfig` from
//! `secret.json`. Loading lives in the infrastructure crate.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::storage::StorageBackend;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_HISTORY_WINDOW: usize = 15;
pub const DEFAULT_DATABASE: &str = "(default)";
pub const DEFAULT_ENTRIES_COLLECTION: &str = "diary_entries";
pub const DEFAULT_CHAT_COLLECTION: &str = "chat_history";

/// Values shipped in config templates that mean "not configured yet".
const PLACEHOLDER_VALUES: &[&str] = &["YOUR_API_KEY_HERE", "YOUR_PROJECT_ID"];

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct JournalConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// `[storage]` section.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StorageConfig {
    /// Directory of the local key-value scope. Defaults to `<config dir>/store`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_dir: Option<PathBuf>,
    /// Remote document store. Local storage is used unless this is fully configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteStoreConfig>,
}

impl StorageConfig {
    /// Picks the backend: remote only when a usable remote section exists.
    pub fn selected_backend(&self) -> StorageBackend {
        match &self.remote {
            Some(remote) if remote.is_configured() => StorageBackend::Remote,
            _ => StorageBackend::Local,
        }
    }
}

/// `[storage.remote]` section (Firestore).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RemoteStoreConfig {
    pub project_id: String,
    pub api_key: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_entries_collection")]
    pub entries_collection: String,
    #[serde(default = "default_chat_collection")]
    pub chat_collection: String,
}

impl RemoteStoreConfig {
    /// True when the project and key are filled in with real values.
    pub fn is_configured(&self) -> bool {
        [&self.project_id, &self.api_key].iter().all(|value| {
            let value = value.trim();
            !value.is_empty() && !PLACEHOLDER_VALUES.contains(&value)
        })
    }
}

/// `[assistant]` section.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Number of most recent messages sent with each request.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Per-entry character budget in the diary index. Unlimited when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_entry_max_chars: Option<usize>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            history_window: default_history_window(),
            index_entry_max_chars: None,
        }
    }
}

/// Root of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_entries_collection() -> String {
    DEFAULT_ENTRIES_COLLECTION.to_string()
}

fn default_chat_collection() -> String {
    DEFAULT_CHAT_COLLECTION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(project_id: &str, api_key: &str) -> RemoteStoreConfig {
        RemoteStoreConfig {
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
            database: default_database(),
            entries_collection: default_entries_collection(),
            chat_collection: default_chat_collection(),
        }
    }

    #[test]
    fn test_defaults_select_local_backend() {
        let config = JournalConfig::default();
        assert_eq!(config.storage.selected_backend(), StorageBackend::Local);
        assert_eq!(config.assistant.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.assistant.history_window, 15);
    }

    #[test]
    fn test_placeholder_remote_falls_back_to_local() {
        let storage = StorageConfig {
            scope_dir: None,
            remote: Some(remote("YOUR_PROJECT_ID", "YOUR_API_KEY_HERE")),
        };
        assert_eq!(storage.selected_backend(), StorageBackend::Local);

        let storage = StorageConfig {
            scope_dir: None,
            remote: Some(remote("my-journal", "  ")),
        };
        assert_eq!(storage.selected_backend(), StorageBackend::Local);
    }

    #[test]
    fn test_configured_remote_selects_remote_backend() {
        let storage = StorageConfig {
            scope_dir: None,
            remote: Some(remote("my-journal", "AIza-real-key")),
        };
        assert_eq!(storage.selected_backend(), StorageBackend::Remote);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: JournalConfig = toml::from_str(
            r#"
[storage.remote]
project_id = "my-journal"
api_key = "key"

[assistant]
temperature = 0.2
"#,
        )
        .unwrap();

        let remote = config.storage.remote.unwrap();
        assert_eq!(remote.database, "(default)");
        assert_eq!(remote.entries_collection, "diary_entries");
        assert_eq!(remote.chat_collection, "chat_history");
        assert_eq!(config.assistant.temperature, 0.2);
        assert_eq!(config.assistant.model, DEFAULT_GEMINI_MODEL);
    }
}
