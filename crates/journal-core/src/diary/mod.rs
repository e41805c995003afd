//! Diary domain module.
//!
//! - `model`: the `DiaryEntry` record, `Mood`, and the keyed `DiaryEntries` map

mod model;

pub use model::{DiaryEntries, DiaryEntry, Mood};
