//! Test doubles for the repository and the assistant.

use async_trait::async_trait;
use journal_core::assistant::{
    AssistantGateway, AssistantReply, AssistantRequest, ToolInvocation, UPDATE_DIARY_TOOL,
};
use journal_core::chat::ChatMessage;
use journal_core::diary::{DiaryEntries, DiaryEntry};
use journal_core::error::{JournalError, Result};
use journal_core::storage::{JournalRepository, StorageBackend};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, Notify};

/// In-memory repository that records every save.
#[derive(Default)]
pub struct MockRepository {
    chat: Vec<ChatMessage>,
    fail: bool,
    saved_entries: Mutex<Vec<DiaryEntry>>,
    saved_messages: Mutex<Vec<ChatMessage>>,
}

impl MockRepository {
    pub fn with_chat(chat: Vec<ChatMessage>) -> Self {
        Self {
            chat,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub async fn saved_entries(&self) -> Vec<DiaryEntry> {
        self.saved_entries.lock().await.clone()
    }

    pub async fn saved_messages(&self) -> Vec<ChatMessage> {
        self.saved_messages.lock().await.clone()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            Err(JournalError::data_access("storage unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl JournalRepository for MockRepository {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Local
    }

    async fn load_entries(&self) -> Result<DiaryEntries> {
        self.check()?;
        Ok(DiaryEntries::new())
    }

    async fn save_entry(&self, entry: &DiaryEntry) -> Result<()> {
        self.check()?;
        self.saved_entries.lock().await.push(entry.clone());
        Ok(())
    }

    async fn load_chat(&self) -> Result<Vec<ChatMessage>> {
        self.check()?;
        Ok(self.chat.clone())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<()> {
        self.check()?;
        self.saved_messages.lock().await.push(message.clone());
        Ok(())
    }
}

/// What the gateway saw of one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub history_ids: Vec<String>,
    pub selected_date_key: String,
    pub user_text: String,
}

/// Scripted assistant.
#[derive(Default)]
pub struct MockGateway {
    reply: Option<AssistantReply>,
    error: Option<JournalError>,
    block: bool,
    called: Notify,
    release: Notify,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockGateway {
    pub fn replying(reply: AssistantReply) -> Self {
        Self {
            reply: Some(reply),
            ..Default::default()
        }
    }

    pub fn failing(error: JournalError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    /// Replies only after [`MockGateway::release`].
    pub fn blocking(reply: AssistantReply) -> Self {
        Self {
            reply: Some(reply),
            block: true,
            ..Default::default()
        }
    }

    pub async fn wait_until_called(&self) {
        self.called.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl AssistantGateway for MockGateway {
    async fn generate_response(&self, request: AssistantRequest<'_>) -> Result<AssistantReply> {
        self.requests.lock().await.push(RecordedRequest {
            history_ids: request.history.iter().map(|m| m.id.clone()).collect(),
            selected_date_key: request.selected_date_key.to_string(),
            user_text: request.user_text.to_string(),
        });
        self.called.notify_one();
        if self.block {
            self.release.notified().await;
        }

        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(self.reply.clone().unwrap_or_default()),
        }
    }
}

/// Builds an `updateDiary` invocation the way the assistant would send it.
pub fn update_diary(date: &str, content: &str, mood: Option<&str>) -> ToolInvocation {
    let mut args = Map::new();
    args.insert("date".to_string(), Value::from(date));
    args.insert("content".to_string(), Value::from(content));
    if let Some(mood) = mood {
        args.insert("mood".to_string(), Value::from(mood));
    }
    ToolInvocation::new(UPDATE_DIARY_TOOL, args)
}
