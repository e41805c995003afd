//! Persistence contract for diary entries and chat messages.

mod repository;

pub use repository::{JournalRepository, StorageBackend};
