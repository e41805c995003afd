//! Terminal rendering of the calendar, entries and messages.

use chrono::{Datelike, NaiveDate};
use colored::Colorize;
use journal_core::chat::{ChatMessage, MessageRole};
use journal_core::date::{format_date_key, is_same_day, month_grid, month_name};
use journal_core::diary::DiaryEntry;
use journal_application::JournalState;

const WEEKDAY_HEADER: &str = " Su   Mo   Tu   We   Th   Fr   Sa";

/// Month browsed by `/prev` and `/next`.
///
/// It jumps to the focused date whenever focus changes, including when the
/// assistant writes an entry for another date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    pub month: NaiveDate,
    focus: NaiveDate,
}

impl CalendarView {
    pub fn new(focus: NaiveDate) -> Self {
        Self {
            month: focus,
            focus,
        }
    }

    pub fn follow(&mut self, focus: NaiveDate) {
        if !is_same_day(self.focus, focus) {
            self.focus = focus;
            self.month = focus;
        }
    }
}

/// Renders the month containing `month`.
///
/// Each day is a five-column cell: `[12*]` is the focused day, `*` marks a
/// day with an entry, and today is highlighted.
pub fn render_calendar(state: &JournalState, month: NaiveDate, today: NaiveDate) -> String {
    let title = format!(
        "{} {}",
        month_name(month.month()).unwrap_or_default(),
        month.year()
    );
    let mut lines = vec![format!("{:^35}", title), WEEKDAY_HEADER.to_string()];

    let cells = match month_grid(month.year(), month.month()) {
        Ok(cells) => cells,
        Err(_) => return lines.join("\n"),
    };

    for week in cells.chunks(7) {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                Some(day) => render_day(state, *day, today),
                None => " ".repeat(5),
            })
            .collect();
        lines.push(row.trim_end().to_string());
    }

    lines.join("\n")
}

fn render_day(state: &JournalState, day: NaiveDate, today: NaiveDate) -> String {
    let selected = is_same_day(day, state.selected_date);
    let has_entry = state.entry_for(day).is_some();

    let number = format!("{:>2}", day.day());
    let number = if is_same_day(day, today) {
        number.bold().yellow().to_string()
    } else if has_entry {
        number.green().to_string()
    } else {
        number
    };

    format!(
        "{}{}{}{}",
        if selected { '[' } else { ' ' },
        number,
        if has_entry { '*' } else { ' ' },
        if selected { ']' } else { ' ' },
    )
}

/// Renders the entry of `date`, or a hint when there is none.
pub fn render_entry(date: NaiveDate, entry: Option<&DiaryEntry>) -> String {
    let key = format_date_key(date);
    match entry {
        Some(entry) => format!(
            "{} ({})\n{}",
            key.bold(),
            entry.mood_or_default(),
            entry.content
        ),
        None => format!("No entry for {}. Use /write <text> or ask the assistant.", key),
    }
}

pub fn render_message(message: &ChatMessage) -> String {
    match message.role {
        MessageRole::User => format!("{} {}", "You:".green().bold(), message.text),
        MessageRole::Model => format!("{} {}", "Journal:".bright_blue().bold(), message.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::diary::{DiaryEntries, Mood};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_calendar_layout_and_markers() {
        plain();
        let mut entries = DiaryEntries::new();
        entries.insert(
            "2024-03-10".to_string(),
            DiaryEntry::new("2024-03-10", "walk", Some(Mood::Calm)),
        );
        let state = JournalState::new(entries, Vec::new(), date(2024, 3, 12));

        let calendar = render_calendar(&state, date(2024, 3, 1), date(2024, 3, 20));
        let lines: Vec<&str> = calendar.lines().collect();

        assert_eq!(lines[0].trim(), "March 2024");
        assert_eq!(lines[1], WEEKDAY_HEADER);
        // March 1st 2024 is a Friday: five blank cells first.
        assert_eq!(lines[2], format!("{}  1    2", " ".repeat(25)));
        assert!(lines[4].contains(" 10* "));
        assert!(lines[4].contains("[12 ]"));
        assert_eq!(lines.len(), 2 + 6);
    }

    #[test]
    fn test_calendar_view_follows_focus_changes() {
        let mut view = CalendarView::new(date(2024, 3, 10));
        view.month = date(2024, 5, 10);

        view.follow(date(2024, 3, 10));
        assert_eq!(view.month, date(2024, 5, 10));

        view.follow(date(2024, 1, 20));
        assert_eq!(view.month, date(2024, 1, 20));
    }

    #[test]
    fn test_entry_rendering() {
        plain();
        let entry = DiaryEntry::new("2024-03-10", "Went for a calm walk.", Some(Mood::Calm));
        assert_eq!(
            render_entry(date(2024, 3, 10), Some(&entry)),
            "2024-03-10 (calm)\nWent for a calm walk."
        );
        assert!(render_entry(date(2024, 3, 11), None).starts_with("No entry for 2024-03-11."));
    }

    #[test]
    fn test_message_rendering() {
        plain();
        assert_eq!(render_message(&ChatMessage::user("hi")), "You: hi");
        assert_eq!(render_message(&ChatMessage::model("hello")), "Journal: hello");
    }
}
