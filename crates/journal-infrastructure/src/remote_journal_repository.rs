//! Remote journal repository.
//!
//! Entries are documents keyed by date, chat messages are documents keyed
//! by message id. Each save writes exactly one document.

use std::sync::Arc;

use async_trait::async_trait;
use journal_core::chat::ChatMessage;
use journal_core::config::RemoteStoreConfig;
use journal_core::diary::{DiaryEntries, DiaryEntry};
use journal_core::error::{JournalError, Result};
use journal_core::storage::{JournalRepository, StorageBackend};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::firestore::{Document, DocumentStore};

const CHAT_ORDER_FIELD: &str = "timestamp";

/// [`JournalRepository`] over a [`DocumentStore`].
#[derive(Clone)]
pub struct RemoteJournalRepository {
    store: Arc<dyn DocumentStore>,
    entries_collection: String,
    chat_collection: String,
}

impl RemoteJournalRepository {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        entries_collection: impl Into<String>,
        chat_collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            entries_collection: entries_collection.into(),
            chat_collection: chat_collection.into(),
        }
    }

    pub fn from_config(store: Arc<dyn DocumentStore>, config: &RemoteStoreConfig) -> Self {
        Self::new(store, &config.entries_collection, &config.chat_collection)
    }
}

fn to_document_data<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(JournalError::internal(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Decodes every document, skipping the ones that don't fit `T`.
fn decode_documents<T: DeserializeOwned>(documents: Vec<Document>, kind: &str) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(
            |doc| match serde_json::from_value::<T>(Value::Object(doc.data)) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(
                        "[RemoteJournalRepository] Skipping malformed {} document '{}': {}",
                        kind,
                        doc.id,
                        e
                    );
                    None
                }
            },
        )
        .collect()
}

#[async_trait]
impl JournalRepository for RemoteJournalRepository {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Remote
    }

    async fn load_entries(&self) -> Result<DiaryEntries> {
        let documents = self
            .store
            .list_documents(&self.entries_collection, None)
            .await?;

        Ok(decode_documents::<DiaryEntry>(documents, "entry")
            .into_iter()
            .map(|entry| (entry.date.clone(), entry))
            .collect())
    }

    async fn save_entry(&self, entry: &DiaryEntry) -> Result<()> {
        let data = to_document_data(entry)?;
        self.store
            .upsert_document(&self.entries_collection, &entry.date, &data)
            .await
    }

    async fn load_chat(&self) -> Result<Vec<ChatMessage>> {
        let documents = self
            .store
            .list_documents(&self.chat_collection, Some(CHAT_ORDER_FIELD))
            .await?;

        Ok(decode_documents(documents, "chat"))
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<()> {
        let data = to_document_data(message)?;
        self.store
            .upsert_document(&self.chat_collection, &message.id, &data)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::diary::Mood;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tokio::sync::Mutex;

    /// In-memory document store, ordered by insertion unless sorted by field.
    #[derive(Default)]
    struct MockDocumentStore {
        collections: Mutex<BTreeMap<String, Vec<Document>>>,
        fail: bool,
    }

    impl MockDocumentStore {
        async fn insert_raw(&self, collection: &str, id: &str, data: Value) {
            let data = data.as_object().cloned().unwrap();
            self.collections
                .lock()
                .await
                .entry(collection.to_string())
                .or_default()
                .push(Document {
                    id: id.to_string(),
                    data,
                });
        }
    }

    #[async_trait]
    impl DocumentStore for MockDocumentStore {
        async fn list_documents(
            &self,
            collection: &str,
            order_by: Option<&str>,
        ) -> Result<Vec<Document>> {
            if self.fail {
                return Err(JournalError::data_access("offline"));
            }
            let mut docs = self
                .collections
                .lock()
                .await
                .get(collection)
                .cloned()
                .unwrap_or_default();
            if let Some(field) = order_by {
                docs.sort_by_key(|doc| doc.data.get(field).and_then(Value::as_i64));
            }
            Ok(docs)
        }

        async fn upsert_document(
            &self,
            collection: &str,
            id: &str,
            data: &Map<String, Value>,
        ) -> Result<()> {
            if self.fail {
                return Err(JournalError::data_access("offline"));
            }
            let mut collections = self.collections.lock().await;
            let docs = collections.entry(collection.to_string()).or_default();
            let doc = Document {
                id: id.to_string(),
                data: data.clone(),
            };
            match docs.iter_mut().find(|existing| existing.id == id) {
                Some(existing) => *existing = doc,
                None => docs.push(doc),
            }
            Ok(())
        }
    }

    fn repository(store: Arc<MockDocumentStore>) -> RemoteJournalRepository {
        RemoteJournalRepository::new(store, "diary_entries", "chat_history")
    }

    #[tokio::test]
    async fn test_entry_document_is_keyed_by_date() {
        let store = Arc::new(MockDocumentStore::default());
        let repo = repository(store.clone());

        repo.save_entry(&DiaryEntry::new("2024-03-10", "first", None))
            .await
            .unwrap();
        repo.save_entry(&DiaryEntry::new("2024-03-10", "second", Some(Mood::Calm)))
            .await
            .unwrap();

        let collections = store.collections.lock().await;
        let docs = &collections["diary_entries"];
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "2024-03-10");
        assert_eq!(docs[0].data["mood"], "calm");
        drop(collections);

        let entries = repo.load_entries().await.unwrap();
        assert_eq!(entries["2024-03-10"].content, "second");
        assert_eq!(repo.backend(), StorageBackend::Remote);
    }

    #[tokio::test]
    async fn test_chat_loads_ordered_by_timestamp() {
        let store = Arc::new(MockDocumentStore::default());
        let repo = repository(store.clone());

        let mut later = ChatMessage::model("later");
        later.timestamp = 2_000;
        let mut earlier = ChatMessage::user("earlier");
        earlier.timestamp = 1_000;
        repo.save_message(&later).await.unwrap();
        repo.save_message(&earlier).await.unwrap();

        let chat = repo.load_chat().await.unwrap();
        assert_eq!(chat, vec![earlier, later]);
    }

    #[tokio::test]
    async fn test_malformed_documents_are_skipped() {
        let store = Arc::new(MockDocumentStore::default());
        store
            .insert_raw(
                "diary_entries",
                "2024-03-10",
                json!({"date": "2024-03-10", "content": "ok", "lastUpdated": 1}),
            )
            .await;
        store
            .insert_raw("diary_entries", "broken", json!({"content": 42}))
            .await;
        store
            .insert_raw("chat_history", "m1", json!({"id": "m1", "role": "robot"}))
            .await;
        let repo = repository(store);

        let entries = repo.load_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("2024-03-10"));
        assert!(repo.load_chat().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let store = Arc::new(MockDocumentStore {
            fail: true,
            ..Default::default()
        });
        let repo = repository(store);

        assert!(repo.load_entries().await.is_err());
        assert!(repo.save_message(&ChatMessage::user("x")).await.is_err());
    }
}
