//! Slash-command parsing.

use chrono::NaiveDate;
use journal_core::date::parse_date_key;

/// Every slash command, as completed and hinted by the editor.
pub const COMMANDS: &[&str] = &[
    "/help",
    "/today",
    "/date",
    "/prev",
    "/next",
    "/calendar",
    "/show",
    "/write",
    "/history",
    "/quit",
];

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Today,
    Date(NaiveDate),
    PrevMonth,
    NextMonth,
    Calendar,
    Show,
    Write(String),
    History,
    Quit,
    /// Anything that isn't a command goes to the assistant.
    Message(String),
}

impl Command {
    /// Parses a trimmed, non-empty input line.
    ///
    /// Returns a user-facing message for malformed commands.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if !line.starts_with('/') {
            return Ok(Command::Message(line.to_string()));
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/help" => Ok(Command::Help),
            "/today" => Ok(Command::Today),
            "/date" => {
                if rest.is_empty() {
                    return Err("Usage: /date YYYY-MM-DD".to_string());
                }
                parse_date_key(rest)
                    .map(Command::Date)
                    .map_err(|_| format!("'{}' is not a valid YYYY-MM-DD date", rest))
            }
            "/prev" => Ok(Command::PrevMonth),
            "/next" => Ok(Command::NextMonth),
            "/calendar" => Ok(Command::Calendar),
            "/show" => Ok(Command::Show),
            "/write" => {
                if rest.is_empty() {
                    Err("Usage: /write <text>".to_string())
                } else {
                    Ok(Command::Write(rest.to_string()))
                }
            }
            "/history" => Ok(Command::History),
            "/quit" | "/exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command '{}'. Type /help.", other)),
        }
    }
}

pub fn help_text() -> &'static str {
    "\
/today              focus today
/date YYYY-MM-DD    focus a date
/prev, /next        show the previous or next month
/calendar           show the current month
/show               show the focused entry
/write <text>       save <text> as the focused entry
/history            show the conversation
/quit               exit
Anything else is sent to the journal assistant."
}
