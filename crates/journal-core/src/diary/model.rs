//! Diary entry domain model.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Mood attached to a diary entry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mood {
    Happy,
    #[default]
    Neutral,
    Sad,
    Excited,
    Calm,
}

/// One diary record for a single calendar date.
///
/// `date` is the unique key (`YYYY-MM-DD`). Saving an entry for a date that
/// already has one replaces it wholesale; content merging, when wanted, is
/// done upstream by whoever writes the new content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    /// Date key in `YYYY-MM-DD` format.
    pub date: String,
    /// Free-form entry text.
    pub content: String,
    /// Optional mood.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    /// Last write time (Unix timestamp in milliseconds).
    pub last_updated: i64,
}

impl DiaryEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(date: impl Into<String>, content: impl Into<String>, mood: Option<Mood>) -> Self {
        Self {
            date: date.into(),
            content: content.into(),
            mood,
            last_updated: Utc::now().timestamp_millis(),
        }
    }

    /// Returns the mood, treating a missing one as neutral.
    pub fn mood_or_default(&self) -> Mood {
        self.mood.unwrap_or_default()
    }
}

/// All entries keyed by date, iterated in ascending date order.
pub type DiaryEntries = BTreeMap<String, DiaryEntry>;
