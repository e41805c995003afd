//! GeminiAssistant - diary assistant over the Gemini REST API.
//!
//! One `generateContent` call per user turn. Function calls in the response
//! are handed back to the caller as [`ToolInvocation`]s; no tool result is
//! ever sent back to the model.

use async_trait::async_trait;
use journal_core::assistant::{AssistantGateway, AssistantReply, AssistantRequest, ToolInvocation};
use journal_core::chat::{ChatMessage, MessageRole};
use journal_core::config::{
    AssistantConfig, DEFAULT_GEMINI_MODEL, DEFAULT_HISTORY_WINDOW, DEFAULT_TEMPERATURE,
};
use journal_core::error::{JournalError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::prompt::{build_diary_index, build_system_instruction, recent_history};
use crate::tools::{Tool, diary_tools};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Reply used whenever the API cannot be reached or understood.
pub const CONNECTION_TROUBLE_TEXT: &str =
    "I'm having trouble connecting to my memory right now. Please try again.";

/// Assistant gateway that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiAssistant {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    history_window: usize,
    index_entry_max_chars: Option<usize>,
}

impl GeminiAssistant {
    /// Creates an assistant with the default model and sampling settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            history_window: DEFAULT_HISTORY_WINDOW,
            index_entry_max_chars: None,
        }
    }

    /// Applies the `[assistant]` section of the configuration.
    pub fn from_config(api_key: impl Into<String>, config: &AssistantConfig) -> Self {
        Self::new(api_key)
            .with_model(&config.model)
            .with_temperature(config.temperature)
            .with_history_window(config.history_window)
            .with_index_entry_max_chars(config.index_entry_max_chars)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Number of most recent messages sent as conversation context.
    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn with_index_entry_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.index_entry_max_chars = max_chars;
        self
    }

    /// Overrides the API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &AssistantRequest<'_>) -> GenerateContentRequest {
        let index = build_diary_index(request.entries, self.index_entry_max_chars);
        let instruction = build_system_instruction(request.today, request.selected_date_key, &index);

        let mut contents: Vec<Content> = recent_history(request.history, self.history_window)
            .iter()
            .map(Content::from_message)
            .collect();
        contents.push(Content::text(MessageRole::User, request.user_text));

        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(instruction)],
            },
            contents,
            tools: diary_tools(),
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<AssistantReply> {
        let url = format!(
            "{}/models/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| JournalError::assistant(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            JournalError::assistant(format!("Failed to parse Gemini response: {err}"))
        })?;

        Ok(extract_reply(parsed))
    }
}

#[async_trait]
impl AssistantGateway for GeminiAssistant {
    async fn generate_response(&self, request: AssistantRequest<'_>) -> Result<AssistantReply> {
        let body = self.build_request(&request);
        tracing::debug!(
            "[GeminiAssistant] Sending {} messages to {} (selected date {})",
            body.contents.len(),
            self.model,
            request.selected_date_key
        );

        match self.send_request(&body).await {
            Ok(reply) => {
                tracing::debug!(
                    "[GeminiAssistant] Reply with {} chars and {} tool invocation(s)",
                    reply.text.len(),
                    reply.tool_invocations.len()
                );
                Ok(reply)
            }
            Err(e) => {
                tracing::error!("[GeminiAssistant] {}", e);
                Ok(AssistantReply::text(CONNECTION_TROUBLE_TEXT))
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: MessageRole, text: &str) -> Self {
        Self {
            role: Some(role.as_ref().to_string()),
            parts: vec![Part::text(text)],
        }
    }

    fn from_message(message: &ChatMessage) -> Self {
        Self::text(message.role, &message.text)
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartResponse {
    text: Option<String>,
    function_call: Option<FunctionCall>,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Map<String, Value>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

/// Takes the first candidate: its first non-empty text plus every function call.
fn extract_reply(response: GenerateContentResponse) -> AssistantReply {
    let parts = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    let mut text = None;
    let mut tool_invocations = Vec::new();
    for part in parts {
        if text.is_none() {
            text = part.text.filter(|t| !t.is_empty());
        }
        if let Some(call) = part.function_call {
            tool_invocations.push(ToolInvocation::new(call.name, call.args));
        }
    }

    AssistantReply::with_tools(text.unwrap_or_default(), tool_invocations)
}

fn map_http_error(status: StatusCode, body: String) -> JournalError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    JournalError::assistant(format!("Gemini API returned {}: {}", status.as_u16(), message))
}
