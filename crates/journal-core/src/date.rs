//! Date-key formatting and month-grid helpers.
//!
//! Diary entries are keyed by `YYYY-MM-DD` strings. Every key that enters the
//! system (from the user, the assistant, or storage) goes through
//! [`parse_date_key`], which only accepts the canonical zero-padded form.

use chrono::{Datelike, Month, Months, NaiveDate};

use crate::error::{JournalError, Result};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Formats a calendar date as a diary key (`YYYY-MM-DD`).
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a diary key, rejecting anything that is not a canonical `YYYY-MM-DD` date.
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    let trimmed = key.trim();
    let date = NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT)
        .map_err(|e| JournalError::invalid_date(format!("'{}': {}", key, e)))?;

    // chrono accepts unpadded fields ("2024-3-1"); keys must round-trip exactly.
    if format_date_key(date) != trimmed {
        return Err(JournalError::invalid_date(format!(
            "'{}': expected YYYY-MM-DD",
            key
        )));
    }

    Ok(date)
}

/// Returns true if both dates fall on the same calendar day.
pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// Returns the English month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Builds the cells of a Sunday-first month calendar.
///
/// The grid starts with one `None` per weekday before the 1st of the month,
/// followed by every day of the month in order. Trailing cells are not padded.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<Option<NaiveDate>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| JournalError::invalid_date(format!("no such month: {year}-{month}")))?;

    let offset = first.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<Option<NaiveDate>> = vec![None; offset];
    cells.extend(
        first
            .iter_days()
            .take_while(|day| day.month() == month)
            .map(Some),
    );

    Ok(cells)
}

/// Moves a date by whole months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, offset: i32) -> Result<NaiveDate> {
    let months = Months::new(offset.unsigned_abs());
    let shifted = if offset >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };

    shifted.ok_or_else(|| {
        JournalError::invalid_date(format!("cannot shift {} by {} months", date, offset))
    })
}
