//! In-memory journal state.

use chrono::NaiveDate;
use journal_core::chat::ChatMessage;
use journal_core::date::format_date_key;
use journal_core::diary::{DiaryEntries, DiaryEntry};

/// Everything the user currently sees: the diary, the conversation and the
/// focused date.
///
/// Only [`crate::JournalUseCase`] mutates it; consumers read clones.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalState {
    pub entries: DiaryEntries,
    pub chat: Vec<ChatMessage>,
    pub selected_date: NaiveDate,
}

impl JournalState {
    pub fn new(entries: DiaryEntries, chat: Vec<ChatMessage>, selected_date: NaiveDate) -> Self {
        Self {
            entries,
            chat,
            selected_date,
        }
    }

    pub fn selected_date_key(&self) -> String {
        format_date_key(self.selected_date)
    }

    pub fn entry_for_selected(&self) -> Option<&DiaryEntry> {
        self.entries.get(&self.selected_date_key())
    }

    pub fn entry_for(&self, date: NaiveDate) -> Option<&DiaryEntry> {
        self.entries.get(&format_date_key(date))
    }

    /// Inserts or replaces the entry for its date.
    pub fn apply_entry(&mut self, entry: DiaryEntry) {
        self.entries.insert(entry.date.clone(), entry);
    }
}
