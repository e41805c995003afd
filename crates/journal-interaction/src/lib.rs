//! Gemini-backed implementation of the diary assistant.

pub mod gemini_assistant;
pub mod prompt;
pub mod tools;

pub use gemini_assistant::{CONNECTION_TROUBLE_TEXT, GeminiAssistant};
