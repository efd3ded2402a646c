//! Language-model provider boundary
//!
//! The agent loop only needs one capability from a provider: given a system
//! prompt, a message history, and a set of tool definitions, return the
//! model's next turn (text and/or tool-use requests). [`LlmProvider`]
//! captures exactly that; [`AnthropicProvider`] implements it against the
//! Anthropic Messages API. No streaming.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default model, overridable via the `CLAUDE_MODEL` environment variable.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Errors from the language-model provider
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Required credential is not configured
    #[error("missing API key: set the {0} environment variable")]
    MissingApiKey(&'static str),

    /// HTTP-level failure talking to the provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an error status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider's response could not be decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tool made available to the model for one request
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One content block of a message, mirroring the Messages API shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// One message of the conversation history
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl Message {
    /// Plain-text user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }

    /// Assistant turn, echoed back verbatim into the history
    pub fn assistant(content: Vec<ContentPart>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Tool results are delivered as a user message of result blocks
    pub fn tool_results(content: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }
}

/// Why the model stopped producing output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    Unknown,
}

impl StopReason {
    fn parse(name: &str) -> Self {
        match name {
            "end_turn" => StopReason::EndTurn,
            "max_tokens" => StopReason::MaxTokens,
            "stop_sequence" => StopReason::StopSequence,
            "tool_use" => StopReason::ToolUse,
            _ => StopReason::Unknown,
        }
    }
}

/// One request to the provider
#[derive(Debug)]
pub struct ChatRequest<'a> {
    pub system: &'a str,
    pub messages: &'a [Message],
    pub tools: &'a [ToolDefinition],
}

/// The model's next turn
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub content: Vec<ContentPart>,
    pub stop_reason: Option<StopReason>,
}

impl ChatTurn {
    /// Concatenated text blocks of this turn.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether the model requested any tool invocations.
    pub fn has_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|part| matches!(part, ContentPart::ToolUse { .. }))
    }
}

/// Minimal provider contract consumed by the agent loop
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatTurn, LlmError>;
}

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AnthropicProvider {
    /// Create a provider with an explicit key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Create a provider from the environment: `ANTHROPIC_API_KEY` is
    /// required; the model falls back to `CLAUDE_MODEL`, then to
    /// [`DEFAULT_MODEL`].
    pub fn from_env(model: Option<String>) -> Result<Self, LlmError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| LlmError::MissingApiKey("ANTHROPIC_API_KEY"))?;
        let model = model
            .or_else(|| std::env::var("CLAUDE_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self::new(api_key, model))
    }

    /// Point the provider at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatTurn, LlmError> {
        let api_request = ApiRequest {
            model: &self.model,
            max_tokens: DEFAULT_MAX_TOKENS,
            system: request.system,
            messages: request.messages,
            tools: if request.tools.is_empty() {
                None
            } else {
                Some(request.tools)
            },
        };

        let url = format!("{}/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&api_request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(parse_api_error(status.as_u16(), &body));
        }

        let api_response: ApiResponse = serde_json::from_str(&body)?;
        Ok(ChatTurn {
            content: api_response.content,
            stop_reason: api_response.stop_reason.as_deref().map(StopReason::parse),
        })
    }
}

fn parse_api_error(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    LlmError::Api { status, message }
}

// Messages API wire types

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentPart>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
