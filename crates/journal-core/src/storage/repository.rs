//! Journal repository trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::chat::ChatMessage;
use crate::diary::{DiaryEntries, DiaryEntry};
use crate::error::Result;

/// The two interchangeable persistence backends.
///
/// Chosen once at startup and never mixed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// Scoped local key-value store.
    Local,
    /// Remote document store.
    Remote,
}

/// An abstract repository for diary entries and the chat transcript.
///
/// This trait decouples the application from the concrete storage
/// (local key-value files or a remote document database). Implementations
/// report failures; the caller decides how to recover.
///
/// Repositories never cache: every load reads the backend.
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Which backend this repository talks to.
    fn backend(&self) -> StorageBackend;

    /// Loads every stored entry keyed by date.
    async fn load_entries(&self) -> Result<DiaryEntries>;

    /// Creates or replaces the entry for `entry.date`.
    async fn save_entry(&self, entry: &DiaryEntry) -> Result<()>;

    /// Loads the chat transcript, oldest first.
    async fn load_chat(&self) -> Result<Vec<ChatMessage>>;

    /// Stores one chat message.
    async fn save_message(&self, message: &ChatMessage) -> Result<()>;
}
