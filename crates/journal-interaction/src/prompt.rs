//! Prompt assembly for the diary assistant.
//!
//! Every call carries the whole diary as a compact index inside the system
//! instruction, so the assistant can answer questions about past days
//! without a retrieval tool.

use chrono::NaiveDate;
use journal_core::chat::ChatMessage;
use journal_core::diary::DiaryEntries;

const TRUNCATION_MARKER: char = '…';

/// Serializes all entries newest-first, one `[Date: .., Content: ..]` line each.
///
/// With `max_chars` set, longer contents are cut at a character boundary
/// and end with `…`.
pub fn build_diary_index(entries: &DiaryEntries, max_chars: Option<usize>) -> String {
    entries
        .values()
        .rev()
        .map(|entry| {
            format!(
                "[Date: {}, Content: {}]",
                entry.date,
                truncate_chars(&entry.content, max_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_chars(text: &str, max_chars: Option<usize>) -> String {
    match max_chars {
        Some(limit) if text.chars().count() > limit => {
            let mut cut: String = text.chars().take(limit).collect();
            cut.push(TRUNCATION_MARKER);
            cut
        }
        _ => text.to_string(),
    }
}

/// Builds the system instruction for one turn.
pub fn build_system_instruction(today: NaiveDate, selected_date_key: &str, index: &str) -> String {
    format!(
        r#"You are "Journal Agent", a warm, empathetic, and intelligent personal diary assistant.

Your Goals:
1. Help the user reflect on their day and write meaningful diary entries.
2. If the user tells you about events, thoughts, or feelings, OFFER to write them down or automatically use the 'updateDiary' tool to save them.
3. **CRITICAL**: If the user asks about past events ("What did I do last week?", "When did I go to the park?"), SEARCH the "DIARY INDEX" provided below and answer based on that fact.
4. When writing a diary entry, make it beautifully written, introspective, and clear.
5. **MERGING**: If the "Current Context" or "DIARY INDEX" shows an entry already exists for the target date, you must COMBINE the new information with the existing text, unless the user specifically asks to overwrite/replace it.

Current Context:
- Today is: {today}
- Currently viewing/editing date: {selected}

DIARY INDEX (Past Knowledge - Use this to answer memory questions):
{index}
"#,
        today = today.format("%a %b %d %Y"),
        selected = selected_date_key,
        index = index,
    )
}

/// The last `window` messages of the conversation.
pub fn recent_history(history: &[ChatMessage], window: usize) -> &[ChatMessage] {
    &history[history.len().saturating_sub(window)..]
}
