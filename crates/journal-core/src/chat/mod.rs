//! Chat domain module.
//!
//! The conversation with the assistant is an append-only sequence of
//! [`ChatMessage`]s owned by the application state.

mod model;

pub use model::{ChatMessage, MessageRole, WELCOME_MESSAGE_ID};
