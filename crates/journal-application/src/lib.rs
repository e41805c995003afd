//! Application layer for the journal.
//!
//! Coordinates the domain with storage and the assistant: best-effort
//! persistence, in-memory state and the conversational use case.

pub mod journal_usecase;
pub mod persistence;
pub mod state;

#[cfg(test)]
mod testing;

pub use journal_usecase::{JournalUseCase, RejectReason, SendOutcome};
pub use persistence::PersistenceAdapter;
pub use state::JournalState;
