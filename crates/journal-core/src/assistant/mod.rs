//! Assistant domain module.
//!
//! - `tool`: structured tool invocations emitted by the assistant and the
//!   decoded `updateDiary` arguments
//! - `gateway`: the request/reply types and the `AssistantGateway` trait

mod gateway;
mod tool;

pub use gateway::{AssistantGateway, AssistantReply, AssistantRequest};
pub use tool::{ToolInvocation, UPDATE_DIARY_TOOL, UpdateDiaryArgs};
