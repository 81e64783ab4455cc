//! Completion Provider Strategy Pattern
//!
//! Defines a common interface for chat-completion backends so the dispatcher
//! handlers and the conversation loop never depend on a concrete vendor.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mcp_core::provider::{CompletionProvider, CompletionRequest};
//!
//! let provider = OpenAiProvider::from_config(config)?;
//! let turn = provider
//!     .complete(CompletionRequest::new(transcript.messages()).with_tools(&tools))
//!     .await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{Message, ToolCallIntent};
use crate::tool::ToolDescriptor;

/// Generation settings owned by a provider instance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gpt-4", "gpt-4o-mini")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    500
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4".into(),
            temperature: None,
            max_tokens: default_max_tokens(),
        }
    }
}

/// How the model may use the advertised tools
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Model decides between text and a tool call
    #[default]
    Auto,
    /// Model must answer with text
    None,
    /// Model must call the named tool
    #[serde(untagged)]
    Tool { name: String },
}

/// Shape of the reply text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    /// Ask the model for a single JSON object
    JsonObject,
}

/// One request to a completion provider
#[derive(Clone, Debug)]
pub struct CompletionRequest<'a> {
    /// Transcript so far; must not be empty
    pub messages: &'a [Message],

    /// Tools the model may call
    pub tools: &'a [ToolDescriptor],

    pub tool_choice: ToolChoice,

    pub response_format: ResponseFormat,

    /// Override for the provider's default token budget
    pub max_tokens: Option<u32>,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            tools: &[],
            tool_choice: ToolChoice::Auto,
            response_format: ResponseFormat::Text,
            max_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: &'a [ToolDescriptor]) -> Self {
        self.tools = tools;
        self
    }

    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }

    pub fn json(mut self) -> Self {
        self.response_format = ResponseFormat::JsonObject;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Next assistant turn: either text or a single tool call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AssistantTurn {
    Text { content: String },
    ToolCall { call: ToolCallIntent },
}

impl AssistantTurn {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn tool_call(call: ToolCallIntent) -> Self {
        Self::ToolCall { call }
    }

    /// Text content, if this is a text turn
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            Self::ToolCall { .. } => None,
        }
    }

    /// Transcript entry for this turn
    pub fn to_message(&self) -> Message {
        match self {
            Self::Text { content } => Message::assistant(content.clone()),
            Self::ToolCall { call } => Message::assistant_tool_call(call.clone()),
        }
    }
}

/// Provider metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "OpenAI")
    pub name: String,

    /// Default model
    pub model: String,

    /// Whether tool/function calling is supported
    pub supports_tools: bool,
}

/// Strategy trait for completion providers
///
/// Implement this trait to add support for new LLM backends.
/// Dispatcher handlers and the conversation loop work exclusively through it.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get provider information and capabilities
    fn info(&self) -> ProviderInfo;

    /// Check if the provider is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Produce the next assistant turn
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<AssistantTurn>;
}

/// One-shot generation from a system prompt and a user prompt
///
/// Returns `None` when the model produced no usable text, so callers can
/// substitute their own fallback.
pub async fn complete_text(
    provider: &dyn CompletionProvider,
    system: &str,
    prompt: &str,
) -> Result<Option<String>> {
    let messages = [Message::system(system), Message::user(prompt)];
    let turn = provider.complete(CompletionRequest::new(&messages)).await?;
    Ok(usable_text(turn))
}

/// One-shot structured generation; the reply must decode as JSON
///
/// Empty replies yield `None`; anything else that does not decode is an
/// [`AgentError::ResponseParse`](crate::AgentError::ResponseParse).
pub async fn complete_json(
    provider: &dyn CompletionProvider,
    system: &str,
    prompt: &str,
) -> Result<Option<serde_json::Value>> {
    let messages = [Message::system(system), Message::user(prompt)];
    let turn = provider
        .complete(CompletionRequest::new(&messages).json())
        .await?;
    usable_text(turn)
        .map(|content| crate::parse_json_reply(&content))
        .transpose()
}

fn usable_text(turn: AssistantTurn) -> Option<String> {
    match turn {
        AssistantTurn::Text { content } if !content.trim().is_empty() => Some(content),
        AssistantTurn::Text { .. } => None,
        AssistantTurn::ToolCall { call } => {
            tracing::warn!(tool = %call.name, "Unrequested tool call in one-shot completion");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.max_tokens, 500);
        assert_eq!(opts.model, "gpt-4");
        assert!(opts.temperature.is_none());
    }

    #[test]
    fn test_tool_choice_wire_forms() {
        let auto: ToolChoice = serde_json::from_str(r#""auto""#).unwrap();
        assert_eq!(auto, ToolChoice::Auto);
        let named: ToolChoice = serde_json::from_str(r#"{"name":"list_sheets"}"#).unwrap();
        assert_eq!(
            named,
            ToolChoice::Tool {
                name: "list_sheets".into()
            }
        );
    }

    #[test]
    fn test_turn_to_message() {
        let message = AssistantTurn::tool_call(ToolCallIntent::new("list_sheets", "{}")).to_message();
        assert!(message.content.is_none());
        assert_eq!(message.tool_call.unwrap().name, "list_sheets");
        assert_eq!(AssistantTurn::text("hi").as_text(), Some("hi"));
    }

    #[tokio::test]
    async fn test_one_shot_helpers() {
        use crate::mock::ScriptedProvider;

        let provider = ScriptedProvider::new()
            .then_text("  ")
            .then_text(r#"{"matches": []}"#)
            .then_text("no json here");

        assert_eq!(complete_text(&provider, "sys", "hi").await.unwrap(), None);
        let parsed = complete_json(&provider, "sys", "hi").await.unwrap().unwrap();
        assert_eq!(parsed["matches"], serde_json::json!([]));
        assert!(complete_json(&provider, "sys", "hi").await.is_err());

        let requests = provider.requests();
        assert_eq!(requests[1].response_format, ResponseFormat::JsonObject);
        assert_eq!(requests[0].messages.len(), 2);
    }
}
