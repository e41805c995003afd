//! Composition root: config, secrets, storage backend and assistant.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use journal_application::{JournalUseCase, PersistenceAdapter};
use journal_core::config::{AssistantConfig, SecretConfig};
use journal_core::secret::SecretService;
use journal_infrastructure::{
    ConfigService, JournalPaths, SecretServiceImpl, create_journal_repository,
};
use journal_interaction::GeminiAssistant;

/// Resolves the Gemini key and model from the secrets.
///
/// A model named in `secret.json` overrides `[assistant].model`.
fn gemini_settings(secrets: SecretConfig, assistant: &AssistantConfig) -> (String, AssistantConfig) {
    let mut assistant = assistant.clone();
    let api_key = match secrets.gemini {
        Some(gemini) => {
            if let Some(model) = gemini.model_name.filter(|m| !m.trim().is_empty()) {
                assistant.model = model;
            }
            gemini.api_key
        }
        None => String::new(),
    };
    (api_key, assistant)
}

/// Wires every component and loads the journal.
pub async fn bootstrap(paths: &JournalPaths, today: NaiveDate) -> Result<Arc<JournalUseCase>> {
    let config = ConfigService::from_paths(paths)?
        .load()
        .context("Failed to load config.toml")?;

    if let Err(e) = paths.ensure_secret_file() {
        tracing::warn!("[Bootstrap] Could not create secret file template: {}", e);
    }
    let secrets = match SecretServiceImpl::from_paths(paths)?.load_secrets().await {
        Ok(secrets) => secrets,
        Err(e) => {
            tracing::warn!("[Bootstrap] {}", e);
            SecretConfig::default()
        }
    };

    let (api_key, assistant_config) = gemini_settings(secrets, &config.assistant);
    if api_key.trim().is_empty() {
        tracing::warn!(
            "[Bootstrap] No Gemini API key in secret.json or GEMINI_API_KEY; assistant calls will fail"
        );
    }
    let gateway = GeminiAssistant::from_config(api_key, &assistant_config);
    tracing::info!("[Bootstrap] Assistant model: {}", gateway.model());

    let repository = create_journal_repository(&config.storage, paths)?;
    let usecase =
        JournalUseCase::initialize(PersistenceAdapter::new(repository), Arc::new(gateway), today)
            .await;

    Ok(Arc::new(usecase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::config::GeminiConfig;
    use tempfile::TempDir;

    #[test]
    fn test_secret_model_overrides_config() {
        let secrets = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "key".to_string(),
                model_name: Some("gemini-2.0-flash".to_string()),
            }),
        };
        let (api_key, assistant) = gemini_settings(secrets, &AssistantConfig::default());
        assert_eq!(api_key, "key");
        assert_eq!(assistant.model, "gemini-2.0-flash");

        let (api_key, assistant) =
            gemini_settings(SecretConfig::default(), &AssistantConfig::default());
        assert!(api_key.is_empty());
        assert_eq!(assistant, AssistantConfig::default());
    }

    #[tokio::test]
    async fn test_configured_model_survives_secret_template() {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::new(Some(temp_dir.path()));
        std::fs::write(
            temp_dir.path().join("config.toml"),
            "[assistant]\nmodel = \"gemini-2.0-pro\"\n",
        )
        .unwrap();

        let config = ConfigService::from_paths(&paths).unwrap().load().unwrap();
        paths.ensure_secret_file().unwrap();
        let secrets = SecretServiceImpl::from_paths(&paths)
            .unwrap()
            .load_secrets()
            .await
            .unwrap();

        let (_, assistant) = gemini_settings(secrets, &config.assistant);
        assert_eq!(assistant.model, "gemini-2.0-pro");
    }

    #[tokio::test]
    async fn test_bootstrap_creates_files_and_welcome() {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::new(Some(temp_dir.path()));
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let usecase = bootstrap(&paths, today).await.unwrap();

        assert!(temp_dir.path().join("config.toml").exists());
        assert!(temp_dir.path().join("secret.json").exists());
        let state = usecase.snapshot().await;
        assert_eq!(state.selected_date, today);
        assert_eq!(state.chat.len(), 1);
    }
}
