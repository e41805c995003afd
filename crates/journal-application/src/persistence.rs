//! Best-effort persistence in front of the selected repository.
//!
//! The journal keeps working when storage doesn't: reads that fail yield
//! empty collections, writes that fail are logged and dropped. Callers never
//! see a storage error.

use std::sync::Arc;

use journal_core::chat::ChatMessage;
use journal_core::diary::{DiaryEntries, DiaryEntry};
use journal_core::storage::{JournalRepository, StorageBackend};

/// Storage-agnostic entry and chat persistence.
#[derive(Clone)]
pub struct PersistenceAdapter {
    repository: Arc<dyn JournalRepository>,
}

impl PersistenceAdapter {
    pub fn new(repository: Arc<dyn JournalRepository>) -> Self {
        Self { repository }
    }

    pub fn backend(&self) -> StorageBackend {
        self.repository.backend()
    }

    /// All stored entries keyed by date; empty if they cannot be read.
    pub async fn load_entries(&self) -> DiaryEntries {
        match self.repository.load_entries().await {
            Ok(entries) => {
                tracing::debug!(
                    "[PersistenceAdapter] Loaded {} entries from {} storage",
                    entries.len(),
                    self.backend()
                );
                entries
            }
            Err(e) => {
                tracing::error!("[PersistenceAdapter] Failed to load entries: {}", e);
                DiaryEntries::new()
            }
        }
    }

    /// Upserts one entry by its date.
    pub async fn save_entry(&self, entry: &DiaryEntry) {
        if let Err(e) = self.repository.save_entry(entry).await {
            tracing::error!(
                "[PersistenceAdapter] Failed to save entry {}: {}",
                entry.date,
                e
            );
        }
    }

    /// The whole conversation in ascending timestamp order; empty if it cannot be read.
    pub async fn load_chat(&self) -> Vec<ChatMessage> {
        match self.repository.load_chat().await {
            Ok(mut chat) => {
                // Stable: equal timestamps keep their stored order.
                chat.sort_by_key(|message| message.timestamp);
                chat
            }
            Err(e) => {
                tracing::error!("[PersistenceAdapter] Failed to load chat: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn save_message(&self, message: &ChatMessage) {
        if let Err(e) = self.repository.save_message(message).await {
            tracing::error!(
                "[PersistenceAdapter] Failed to save message {}: {}",
                message.id,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRepository;

    #[tokio::test]
    async fn test_read_failures_yield_empty_collections() {
        let repository = Arc::new(MockRepository::failing());
        let adapter = PersistenceAdapter::new(repository);

        assert!(adapter.load_entries().await.is_empty());
        assert!(adapter.load_chat().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failures_are_swallowed() {
        let repository = Arc::new(MockRepository::failing());
        let adapter = PersistenceAdapter::new(repository.clone());

        adapter
            .save_entry(&DiaryEntry::new("2024-03-10", "text", None))
            .await;
        adapter.save_message(&ChatMessage::user("hi")).await;

        assert!(repository.saved_entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_chat_is_sorted_by_timestamp() {
        let mut late = ChatMessage::model("late");
        late.timestamp = 30;
        let mut first_tie = ChatMessage::user("first tie");
        first_tie.timestamp = 10;
        let mut second_tie = ChatMessage::model("second tie");
        second_tie.timestamp = 10;

        let repository = Arc::new(MockRepository::with_chat(vec![
            late.clone(),
            first_tie.clone(),
            second_tie.clone(),
        ]));
        let adapter = PersistenceAdapter::new(repository);

        assert_eq!(adapter.load_chat().await, vec![first_tie, second_tie, late]);
    }
}
