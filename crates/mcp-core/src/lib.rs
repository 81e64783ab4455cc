//! # mcp-core
//!
//! Tool dispatcher, provider abstractions and the conversation loop behind
//! the MCP gateway.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     ConversationLoop                         │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐  │
//! │  │  Transcript  │──▶│ CompletionProvider│──▶│ ToolDispatch │  │
//! │  └──────────────┘   └──────────────────┘   └──────┬───────┘  │
//! └───────────────────────────────────────────────────┼──────────┘
//!                                                     ▼
//!                               Dispatcher<K: ToolKind, H: ToolHandler<K>>
//!                                                     │
//!                                   ResourceProvider + CompletionProvider
//! ```
//!
//! Domains (dog data, spreadsheet data) plug in a closed tool enum and a
//! handler; the dispatcher and the loop are shared.

pub mod config;
pub mod conversation;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod mock;
pub mod provider;
pub mod resource;
pub mod tool;

pub use conversation::{ConversationLoop, LoopConfig, LoopState, TurnOutcome};
pub use dispatcher::{Dispatcher, ToolDispatch};
pub use error::{AgentError, Result};
pub use message::{link_tool_calls, Message, Role, ToolCallIntent, Transcript};
pub use provider::{
    complete_json, complete_text, AssistantTurn, CompletionProvider, CompletionRequest,
    GenerationOptions, ResponseFormat, ToolChoice,
};
pub use resource::{numeric_id, ResourceDescriptor, ResourceProvider};
pub use tool::{
    string_param, ParameterSchema, Parameters, ToolDescriptor, ToolHandler, ToolInvocationRequest,
    ToolInvocationResult, ToolKind, ToolRegistry,
};

/// Extract a JSON object from model output that may wrap it in prose or a
/// fenced code block
///
/// Returns [`AgentError::ResponseParse`] when no JSON value can be decoded.
pub fn parse_json_reply(content: &str) -> Result<serde_json::Value> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AgentError::ResponseParse("empty response".into()));
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let fenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.rsplit_once("```"))
        .map(|(body, _)| body.trim());
    if let Some(body) = fenced {
        if let Ok(value) = serde_json::from_str(body) {
            return Ok(value);
        }
    }

    let preview: String = trimmed.chars().take(80).collect();
    Err(AgentError::ResponseParse(preview))
}
