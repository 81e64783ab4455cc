//! Scripted Completion Provider
//!
//! For tests and offline demos. Replays a fixed queue of assistant turns and
//! records every request it receives.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::{Message, ToolCallIntent};
use crate::provider::{
    AssistantTurn, CompletionProvider, CompletionRequest, ProviderInfo, ResponseFormat, ToolChoice,
};

/// Snapshot of one request seen by [`ScriptedProvider`]
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<String>,
    pub tool_choice: ToolChoice,
    pub response_format: ResponseFormat,
}

/// Provider that answers from a script
#[derive(Default)]
pub struct ScriptedProvider {
    turns: Mutex<VecDeque<std::result::Result<AssistantTurn, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text reply
    pub fn then_text(self, content: impl Into<String>) -> Self {
        self.push(Ok(AssistantTurn::text(content)))
    }

    /// Queue a tool call with JSON-encoded arguments
    pub fn then_tool_call(self, name: &str, arguments: serde_json::Value) -> Self {
        self.push(Ok(AssistantTurn::tool_call(ToolCallIntent::new(
            name,
            arguments.to_string(),
        ))))
    }

    /// Queue an arbitrary turn
    pub fn then_turn(self, turn: AssistantTurn) -> Self {
        self.push(Ok(turn))
    }

    /// Queue an upstream failure
    pub fn then_error(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()))
    }

    fn push(self, turn: std::result::Result<AssistantTurn, String>) -> Self {
        self.turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(turn);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `complete` calls received
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "Scripted".into(),
            model: "scripted".into(),
            supports_tools: true,
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<AssistantTurn> {
        if request.messages.is_empty() {
            return Err(AgentError::InvalidRequest("transcript is empty".into()));
        }

        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                messages: request.messages.to_vec(),
                tools: request.tools.iter().map(|t| t.name.clone()).collect(),
                tool_choice: request.tool_choice.clone(),
                response_format: request.response_format,
            });

        let next = self
            .turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(turn)) => Ok(turn),
            Some(Err(message)) => Err(AgentError::Completion(message)),
            None => Err(AgentError::Completion("script exhausted".into())),
        }
    }
}
