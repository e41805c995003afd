//! Assistant gateway trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::tool::ToolInvocation;
use crate::chat::ChatMessage;
use crate::diary::DiaryEntries;
use crate::error::Result;

/// Everything the assistant needs for one turn.
#[derive(Debug, Clone, Copy)]
pub struct AssistantRequest<'a> {
    /// The real-world current date.
    pub today: NaiveDate,
    /// Conversation so far, oldest first, not including `user_text`.
    pub history: &'a [ChatMessage],
    /// Every known entry, used to build the diary index.
    pub entries: &'a DiaryEntries,
    /// Date key currently focused in the UI.
    pub selected_date_key: &'a str,
    /// The newly submitted user text.
    pub user_text: &'a str,
}

/// Text plus requested tool invocations from a single assistant call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    /// First textual part of the response; may be empty.
    pub text: String,
    /// All requested invocations, in response order.
    pub tool_invocations: Vec<ToolInvocation>,
}

impl AssistantReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_invocations: Vec::new(),
        }
    }

    pub fn with_tools(text: impl Into<String>, tool_invocations: Vec<ToolInvocation>) -> Self {
        Self {
            text: text.into(),
            tool_invocations,
        }
    }
}

/// A single-shot conversational assistant.
///
/// One call is one request/response round trip: if the assistant asks for a
/// tool, the invocation is returned to the caller and the assistant is not
/// called again with a tool result.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    async fn generate_response(&self, request: AssistantRequest<'_>) -> Result<AssistantReply>;
}
