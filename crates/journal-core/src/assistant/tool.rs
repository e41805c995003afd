//! Tool invocations requested by the assistant.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::date::{format_date_key, parse_date_key};
use crate::diary::{DiaryEntry, Mood};
use crate::error::{JournalError, Result};

/// Name of the single capability declared to the assistant.
pub const UPDATE_DIARY_TOOL: &str = "updateDiary";

/// A structured request from the assistant to run a named action.
///
/// Produced once per assistant turn and consumed immediately; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn is_update_diary(&self) -> bool {
        self.name == UPDATE_DIARY_TOOL
    }
}

/// Decoded arguments of an `updateDiary` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDiaryArgs {
    /// Canonical `YYYY-MM-DD` key.
    pub date: String,
    pub content: String,
    pub mood: Option<Mood>,
}

impl UpdateDiaryArgs {
    /// Decodes and validates the arguments of an `updateDiary` invocation.
    ///
    /// `date` and `content` are required strings and `date` must be a valid
    /// calendar date. A mood outside the known set is dropped rather than
    /// rejected.
    pub fn from_invocation(invocation: &ToolInvocation) -> Result<Self> {
        if !invocation.is_update_diary() {
            return Err(JournalError::assistant(format!(
                "expected '{}' invocation, got '{}'",
                UPDATE_DIARY_TOOL, invocation.name
            )));
        }

        let date = required_str(&invocation.args, "date")?;
        let date = format_date_key(parse_date_key(date)?);
        let content = required_str(&invocation.args, "content")?.to_string();

        let mood = match invocation.args.get("mood") {
            Some(Value::String(raw)) => match Mood::from_str(raw.trim()) {
                Ok(mood) => Some(mood),
                Err(_) => {
                    tracing::warn!("[UpdateDiaryArgs] Ignoring unknown mood '{}'", raw);
                    None
                }
            },
            _ => None,
        };

        Ok(Self {
            date,
            content,
            mood,
        })
    }

    /// Builds the entry to store, defaulting the mood to neutral.
    pub fn into_entry(self) -> DiaryEntry {
        DiaryEntry::new(self.date, self.content, Some(self.mood.unwrap_or_default()))
    }
}

fn required_str<'a>(args: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    args.get(field).and_then(Value::as_str).ok_or_else(|| {
        JournalError::assistant(format!(
            "'{}' is missing string argument '{}'",
            UPDATE_DIARY_TOOL, field
        ))
    })
}
