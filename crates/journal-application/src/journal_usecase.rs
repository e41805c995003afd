//! Journal use case implementation.
//!
//! `JournalUseCase` owns the journal state and runs every user-visible
//! operation against it: date focus, manual edits, and conversational turns
//! in which the assistant may write entries through `updateDiary`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use journal_core::assistant::{AssistantGateway, AssistantReply, AssistantRequest, UpdateDiaryArgs};
use journal_core::chat::ChatMessage;
use journal_core::date::parse_date_key;
use journal_core::diary::{DiaryEntry, Mood};
use journal_core::error::Result;
use tokio::sync::RwLock;

use crate::persistence::PersistenceAdapter;
use crate::state::JournalState;

/// Shown in place of a reply when a turn cannot be completed.
pub const PROCESSING_ERROR_TEXT: &str =
    "I encountered an error connecting to my services. Please try again.";

/// Shown when the assistant returned nothing and wrote nothing.
pub const FALLBACK_REPLY_TEXT: &str = "I've processed that for you.";

fn saved_confirmation(date: &str) -> String {
    format!("I've saved that entry for {date}.")
}

/// Why a message was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Nothing but whitespace was submitted.
    Empty,
    /// A previous turn is still being processed.
    Busy,
}

/// Result of [`JournalUseCase::send_message`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The message was ignored; state is unchanged.
    Rejected(RejectReason),
    /// The turn completed with this model message appended.
    Replied(ChatMessage),
}

/// Clears the processing latch when the turn ends, however it ends.
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ProcessingGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Orchestrates the diary, the conversation and the assistant.
///
/// # Concurrency
///
/// State lives behind a `tokio::sync::RwLock` that is never held across an
/// await on storage or the assistant. At most one conversational turn runs
/// at a time; a second `send_message` while one is in flight is rejected,
/// not queued.
pub struct JournalUseCase {
    persistence: PersistenceAdapter,
    gateway: Arc<dyn AssistantGateway>,
    today: NaiveDate,
    state: RwLock<JournalState>,
    processing: AtomicBool,
}

impl JournalUseCase {
    /// Loads entries and chat, focusing `today`.
    ///
    /// An empty conversation is seeded with the welcome message, which is
    /// kept in memory only.
    pub async fn initialize(
        persistence: PersistenceAdapter,
        gateway: Arc<dyn AssistantGateway>,
        today: NaiveDate,
    ) -> Self {
        let entries = persistence.load_entries().await;
        let mut chat = persistence.load_chat().await;
        if chat.is_empty() {
            chat.push(ChatMessage::welcome());
        }

        tracing::info!(
            "[JournalUseCase] Initialized with {} entries and {} messages ({} storage)",
            entries.len(),
            chat.len(),
            persistence.backend()
        );

        Self {
            persistence,
            gateway,
            today,
            state: RwLock::new(JournalState::new(entries, chat, today)),
            processing: AtomicBool::new(false),
        }
    }

    /// True while a conversational turn is in flight.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub async fn select_date(&self, date: NaiveDate) {
        self.state.write().await.selected_date = date;
    }

    pub async fn selected_date(&self) -> NaiveDate {
        self.state.read().await.selected_date
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> JournalState {
        self.state.read().await.clone()
    }

    pub async fn entry_for_selected(&self) -> Option<DiaryEntry> {
        self.state.read().await.entry_for_selected().cloned()
    }

    /// Writes `content` as the entry of the focused date with a neutral mood.
    ///
    /// The in-memory state is updated before storage is written.
    pub async fn save_manual_entry(&self, content: &str) -> DiaryEntry {
        let entry = {
            let mut state = self.state.write().await;
            let entry = DiaryEntry::new(state.selected_date_key(), content, Some(Mood::Neutral));
            state.apply_entry(entry.clone());
            entry
        };

        tracing::debug!("[JournalUseCase] Manual save for {}", entry.date);
        self.persistence.save_entry(&entry).await;
        entry
    }

    /// Runs one conversational turn.
    ///
    /// The user message is appended and persisted in the background, the
    /// assistant is called once, requested diary writes are applied and
    /// persisted, and the model's reply is appended and persisted.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Rejected(RejectReason::Empty);
        }
        let Some(_guard) = ProcessingGuard::try_acquire(&self.processing) else {
            tracing::debug!("[JournalUseCase] Turn in progress, rejecting message");
            return SendOutcome::Rejected(RejectReason::Busy);
        };

        let (user_message, history, entries, selected_date_key) = {
            let mut state = self.state.write().await;
            let user_message = ChatMessage::user(text).stamped_after(state.chat.last());
            let history = state.chat.clone();
            state.chat.push(user_message.clone());
            (
                user_message,
                history,
                state.entries.clone(),
                state.selected_date_key(),
            )
        };

        let persistence = self.persistence.clone();
        tokio::spawn(async move {
            persistence.save_message(&user_message).await;
        });

        let request = AssistantRequest {
            today: self.today,
            history: &history,
            entries: &entries,
            selected_date_key: &selected_date_key,
            user_text: text,
        };

        let reply_text = match self.gateway.generate_response(request).await {
            Ok(reply) => match self.apply_reply(reply).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[JournalUseCase] Failed to apply assistant reply: {}", e);
                    PROCESSING_ERROR_TEXT.to_string()
                }
            },
            Err(e) => {
                tracing::error!("[JournalUseCase] Assistant call failed: {}", e);
                PROCESSING_ERROR_TEXT.to_string()
            }
        };

        let model_message = {
            let mut state = self.state.write().await;
            let model_message = ChatMessage::model(reply_text).stamped_after(state.chat.last());
            state.chat.push(model_message.clone());
            model_message
        };
        self.persistence.save_message(&model_message).await;

        SendOutcome::Replied(model_message)
    }

    /// Applies the diary writes of a reply and returns the text to show.
    ///
    /// Every `updateDiary` invocation is decoded before any is applied, so a
    /// malformed one leaves the diary untouched.
    async fn apply_reply(&self, reply: AssistantReply) -> Result<String> {
        let mut updates = Vec::new();
        for invocation in &reply.tool_invocations {
            if invocation.is_update_diary() {
                let args = UpdateDiaryArgs::from_invocation(invocation)?;
                let date = parse_date_key(&args.date)?;
                updates.push((date, args.into_entry()));
            } else {
                tracing::warn!(
                    "[JournalUseCase] Ignoring unknown tool invocation '{}'",
                    invocation.name
                );
            }
        }

        let mut first_written: Option<String> = None;
        for (date, entry) in updates {
            {
                let mut state = self.state.write().await;
                state.apply_entry(entry.clone());
                state.selected_date = date;
            }
            tracing::info!("[JournalUseCase] Assistant updated entry {}", entry.date);
            self.persistence.save_entry(&entry).await;
            first_written.get_or_insert(entry.date);
        }

        if !reply.text.is_empty() {
            return Ok(reply.text);
        }
        Ok(match first_written {
            Some(date) => saved_confirmation(&date),
            None => FALLBACK_REPLY_TEXT.to_string(),
        })
    }
}
