//! Domain layer of the journal: entries, chat, assistant contracts and
//! the persistence contract.

pub mod assistant;
pub mod chat;
pub mod config;
pub mod date;
pub mod diary;
pub mod error;
pub mod secret;
pub mod storage;

// Re-export common error type
pub use error::{JournalError, Result};
