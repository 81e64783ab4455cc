//! Conversation Messages
//!
//! Transcript format shared by the conversation loop, the completion
//! providers and the HTTP chat endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::tool::Parameters;

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool result (injected as context)
    #[serde(alias = "function")]
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A model-produced request to run one tool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallIntent {
    /// Provider-assigned call ID, echoed back on the tool message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Tool identifier
    pub name: String,

    /// JSON-encoded argument object
    #[serde(default = "empty_arguments")]
    pub arguments: String,
}

fn empty_arguments() -> String {
    "{}".into()
}

impl ToolCallIntent {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Assign a call ID if the provider did not supply one
    pub fn ensure_id(&mut self) -> &str {
        self.id
            .get_or_insert_with(|| format!("call_{}", uuid::Uuid::new_v4().simple()))
    }

    /// Decode the argument string into a parameter map
    ///
    /// An empty string is treated as `{}`.
    pub fn parse_arguments(&self) -> Result<Parameters> {
        let raw = self.arguments.trim();
        if raw.is_empty() {
            return Ok(Parameters::new());
        }
        match serde_json::from_str::<serde_json::Value>(raw)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(AgentError::InvalidRequest(format!(
                "arguments for '{}' must be a JSON object, got {}",
                self.name, other
            ))),
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content (absent on assistant tool-call turns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool call requested by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallIntent>,

    /// Tool that produced this message (tool role only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    /// Call ID this message answers (tool role only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new text message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_call: None,
            tool_name: None,
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create an assistant message carrying a tool call
    pub fn assistant_tool_call(intent: ToolCallIntent) -> Self {
        Self {
            role: Role::Assistant,
            content: None,
            tool_call: Some(intent),
            tool_name: None,
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a tool result message answering `intent`
    pub fn tool(intent: &ToolCallIntent, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_call: None,
            tool_name: Some(intent.name.clone()),
            tool_call_id: intent.id.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Text content or empty string
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// Copy `messages` with every tool call paired to its tool message by ID
///
/// Assistant tool calls without an ID get one, and a following tool message
/// without a `toolCallId` takes the ID of the call it answers.
pub fn link_tool_calls(messages: &[Message]) -> Vec<Message> {
    let mut linked = messages.to_vec();
    let mut pending: Option<String> = None;
    for message in &mut linked {
        match message.role {
            Role::Assistant => {
                pending = message
                    .tool_call
                    .as_mut()
                    .map(|call| call.ensure_id().to_string());
            }
            Role::Tool => {
                let answered = pending.take();
                if message.tool_call_id.is_none() {
                    message.tool_call_id = answered;
                }
            }
            Role::System | Role::User => pending = None,
        }
    }
    linked
}

/// Append-only conversation history
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
        }
    }

    /// Append a message
    ///
    /// A tool message is accepted only directly after the assistant
    /// message whose tool call it answers.
    pub fn push(&mut self, message: Message) -> Result<()> {
        if message.role == Role::Tool {
            let name = message.tool_name.as_deref().ok_or_else(|| {
                AgentError::Transcript("tool message is missing its tool name".into())
            })?;
            let requested = self
                .messages
                .last()
                .filter(|m| m.role == Role::Assistant)
                .and_then(|m| m.tool_call.as_ref());
            match requested {
                Some(intent) if intent.name == name => {}
                Some(intent) => {
                    return Err(AgentError::Transcript(format!(
                        "tool message for '{name}' follows a call to '{}'",
                        intent.name
                    )));
                }
                None => {
                    return Err(AgentError::Transcript(format!(
                        "tool message for '{name}' does not follow an assistant tool call"
                    )));
                }
            }
        }
        self.messages.push(message);
        Ok(())
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of tool messages answering `tool`
    pub fn tool_messages_for(&self, tool: &str) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Tool && m.tool_name.as_deref() == Some(tool))
            .count()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
