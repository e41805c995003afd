//! Local journal repository.
//!
//! Keeps two serialized snapshots in a scoped key-value store: the whole
//! entry mapping under [`ENTRIES_KEY`] and the whole chat array under
//! [`CHAT_KEY`].

use std::sync::Arc;

use async_trait::async_trait;
use journal_core::chat::ChatMessage;
use journal_core::diary::{DiaryEntries, DiaryEntry};
use journal_core::error::Result;
use journal_core::storage::{JournalRepository, StorageBackend};

use crate::storage::KeyValueStore;

/// Key of the JSON object `date -> entry`.
pub const ENTRIES_KEY: &str = "mindful_journal_entries";
/// Key of the JSON array of chat messages.
pub const CHAT_KEY: &str = "mindful_journal_chat";

/// [`JournalRepository`] over a [`KeyValueStore`].
#[derive(Clone)]
pub struct LocalJournalRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LocalJournalRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

fn parse_entries(raw: Option<String>) -> Result<DiaryEntries> {
    match raw {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(DiaryEntries::new()),
    }
}

fn parse_chat(raw: Option<String>) -> Result<Vec<ChatMessage>> {
    match raw {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

#[async_trait]
impl JournalRepository for LocalJournalRepository {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Local
    }

    async fn load_entries(&self) -> Result<DiaryEntries> {
        parse_entries(self.store.get(ENTRIES_KEY).await?)
    }

    async fn save_entry(&self, entry: &DiaryEntry) -> Result<()> {
        tracing::debug!("[LocalJournalRepository] Saving entry {}", entry.date);
        let entry = entry.clone();
        self.store
            .update(
                ENTRIES_KEY,
                Box::new(move |current| {
                    let mut entries = parse_entries(current)?;
                    entries.insert(entry.date.clone(), entry);
                    Ok(serde_json::to_string(&entries)?)
                }),
            )
            .await
    }

    async fn load_chat(&self) -> Result<Vec<ChatMessage>> {
        parse_chat(self.store.get(CHAT_KEY).await?)
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<()> {
        tracing::debug!("[LocalJournalRepository] Appending message {}", message.id);
        let message = message.clone();
        self.store
            .update(
                CHAT_KEY,
                Box::new(move |current| {
                    let mut history = parse_chat(current)?;
                    history.push(message);
                    Ok(serde_json::to_string(&history)?)
                }),
            )
            .await
    }
}
