//! Conversation Loop
//!
//! Collects messages, asks the provider for the next turn, honors at most one
//! tool call per user turn and asks again for the final reply.
//!
//! ```text
//!  AwaitingUserInput / Idle
//!          │ user input
//!          ▼
//!  AwaitingFirstCompletion ──text──────────────────────────────▶ Idle
//!          │ tool call
//!          ▼
//!  AwaitingToolResult ──dispatch──▶ AwaitingFinalCompletion ──text──▶ Idle
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::dispatcher::ToolDispatch;
use crate::error::{AgentError, Result};
use crate::message::{Message, ToolCallIntent, Transcript};
use crate::provider::{AssistantTurn, CompletionProvider, CompletionRequest, ToolChoice};
use crate::tool::{ToolDescriptor, ToolInvocationResult};

/// Reply used when the model asks for a second tool in the same turn
pub const SECOND_TOOL_CALL_NOTICE: &str =
    "I can only use one tool per message. Please ask a follow-up question to continue.";

/// Where the loop is within a user turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    AwaitingUserInput,
    AwaitingFirstCompletion,
    AwaitingToolResult,
    AwaitingFinalCompletion,
    Idle,
}

/// Result of one user turn
#[derive(Clone, Debug, Serialize)]
pub struct TurnOutcome {
    /// Text shown to the user
    pub reply: String,

    /// Tool call honored during the turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallIntent>,

    /// Dispatcher result for that call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolInvocationResult>,

    /// States entered, in order
    pub states: Vec<LoopState>,

    /// Whether a completion failure ended the turn
    pub failed: bool,
}

/// Loop configuration
#[derive(Clone, Debug)]
pub struct LoopConfig {
    /// System prompt placed at the head of the transcript
    pub system_prompt: String,

    /// Tool policy for the first completion of each turn
    pub tool_choice: ToolChoice,
}

impl LoopConfig {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            tool_choice: ToolChoice::Auto,
        }
    }
}

/// One conversation session
pub struct ConversationLoop {
    provider: Arc<dyn CompletionProvider>,
    tools: Arc<dyn ToolDispatch>,
    config: LoopConfig,
    transcript: Transcript,
    state: LoopState,
    descriptors: Vec<ToolDescriptor>,
}

impl ConversationLoop {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        tools: Arc<dyn ToolDispatch>,
        config: LoopConfig,
    ) -> Self {
        let transcript = Transcript::with_system_prompt(config.system_prompt.clone());
        Self {
            provider,
            tools,
            config,
            transcript,
            state: LoopState::AwaitingUserInput,
            descriptors: Vec::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run one user turn
    ///
    /// Completion failures do not return `Err`: the error text becomes the
    /// reply and the loop goes back to `Idle`. `Err` is reserved for
    /// transcript violations and calls made mid-turn.
    pub async fn submit(&mut self, input: &str) -> Result<TurnOutcome> {
        if !matches!(self.state, LoopState::AwaitingUserInput | LoopState::Idle) {
            return Err(AgentError::InvalidRequest(format!(
                "cannot accept input while {:?}",
                self.state
            )));
        }

        let mut trace = Vec::new();
        self.transcript.push(Message::user(input))?;
        self.enter(LoopState::AwaitingFirstCompletion, &mut trace);

        let tools = self.tool_descriptors().await;
        let first = self
            .provider
            .complete(
                CompletionRequest::new(self.transcript.messages())
                    .with_tools(&tools)
                    .tool_choice(self.config.tool_choice.clone()),
            )
            .await;

        let mut call = match first {
            Ok(AssistantTurn::Text { content }) => {
                self.transcript.push(Message::assistant(content.clone()))?;
                self.enter(LoopState::Idle, &mut trace);
                return Ok(TurnOutcome {
                    reply: content,
                    tool_call: None,
                    tool_result: None,
                    states: trace,
                    failed: false,
                });
            }
            Ok(AssistantTurn::ToolCall { call }) => call,
            Err(e) => return Ok(self.fail(&e, trace, None, None)),
        };

        call.ensure_id();
        tracing::info!(tool = %call.name, "Assistant is using tool");
        self.transcript
            .push(Message::assistant_tool_call(call.clone()))?;
        self.enter(LoopState::AwaitingToolResult, &mut trace);

        let result = match call.parse_arguments() {
            Ok(parameters) => self.tools.invoke(&call.name, &parameters).await,
            Err(e) => ToolInvocationResult::failure(format!(
                "Invalid arguments for {}: {e}",
                call.name
            )),
        };
        self.transcript
            .push(Message::tool(&call, result.to_json_string()))?;
        self.enter(LoopState::AwaitingFinalCompletion, &mut trace);

        let second = self
            .provider
            .complete(CompletionRequest::new(self.transcript.messages()).tool_choice(ToolChoice::None))
            .await;

        let reply = match second {
            Ok(AssistantTurn::Text { content }) => content,
            Ok(AssistantTurn::ToolCall { call: extra }) => {
                tracing::warn!(tool = %extra.name, "Ignoring second tool call in one turn");
                SECOND_TOOL_CALL_NOTICE.to_string()
            }
            Err(e) => return Ok(self.fail(&e, trace, Some(call), Some(result))),
        };

        self.transcript.push(Message::assistant(reply.clone()))?;
        self.enter(LoopState::Idle, &mut trace);
        Ok(TurnOutcome {
            reply,
            tool_call: Some(call),
            tool_result: Some(result),
            states: trace,
            failed: false,
        })
    }

    fn enter(&mut self, state: LoopState, trace: &mut Vec<LoopState>) {
        tracing::trace!(from = ?self.state, to = ?state, "Loop transition");
        self.state = state;
        trace.push(state);
    }

    fn fail(
        &mut self,
        error: &AgentError,
        mut trace: Vec<LoopState>,
        tool_call: Option<ToolCallIntent>,
        tool_result: Option<ToolInvocationResult>,
    ) -> TurnOutcome {
        tracing::error!(error = %error, "Completion failed");
        self.enter(LoopState::Idle, &mut trace);
        TurnOutcome {
            reply: error.to_string(),
            tool_call,
            tool_result,
            states: trace,
            failed: true,
        }
    }

    async fn tool_descriptors(&mut self) -> Vec<ToolDescriptor> {
        if self.descriptors.is_empty() {
            self.descriptors = self.tools.descriptors().await;
        }
        self.descriptors.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::mock::ScriptedProvider;
    use crate::tool::Parameters;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Dispatcher stub that records invocations
    #[derive(Default)]
    struct RecordingTools {
        calls: Mutex<Vec<(String, Parameters)>>,
    }

    #[async_trait]
    impl ToolDispatch for RecordingTools {
        async fn descriptors(&self) -> Vec<ToolDescriptor> {
            vec![ToolDescriptor::new("list_sheets", "List sheets", vec![])]
        }

        async fn invoke(&self, name: &str, parameters: &Parameters) -> ToolInvocationResult {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), parameters.clone()));
            ToolInvocationResult::success(json!({"totalCount": 2}))
        }
    }

    fn session(provider: ScriptedProvider) -> (ConversationLoop, Arc<ScriptedProvider>, Arc<RecordingTools>) {
        let provider = Arc::new(provider);
        let tools = Arc::new(RecordingTools::default());
        let session = ConversationLoop::new(
            provider.clone(),
            tools.clone(),
            LoopConfig::new("You are helpful."),
        );
        (session, provider, tools)
    }

    #[tokio::test]
    async fn test_tool_turn_walks_every_state() {
        let (mut session, provider, tools) = session(
            ScriptedProvider::new()
                .then_tool_call("list_sheets", json!({}))
                .then_text("You have 2 sheets."),
        );
        assert_eq!(session.state(), LoopState::AwaitingUserInput);

        let outcome = session.submit("What sheets do I have?").await.unwrap();

        assert_eq!(
            outcome.states,
            [
                LoopState::AwaitingFirstCompletion,
                LoopState::AwaitingToolResult,
                LoopState::AwaitingFinalCompletion,
                LoopState::Idle,
            ]
        );
        assert_eq!(outcome.reply, "You have 2 sheets.");
        assert!(!outcome.failed);
        assert_eq!(session.state(), LoopState::Idle);

        let transcript = session.transcript();
        assert_eq!(transcript.tool_messages_for("list_sheets"), 1);
        let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [Role::System, Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );
        let tool_message = &transcript.messages()[3];
        assert_eq!(tool_message.tool_name.as_deref(), Some("list_sheets"));
        assert_eq!(
            tool_message.tool_call_id,
            transcript.messages()[2].tool_call.as_ref().unwrap().id
        );

        assert_eq!(tools.calls.lock().unwrap().len(), 1);
        let requests = provider.requests();
        assert_eq!(requests[0].tools, ["list_sheets"]);
        assert!(requests[1].tools.is_empty());
    }

    #[tokio::test]
    async fn test_text_turn_skips_tools() {
        let (mut session, provider, tools) = session(ScriptedProvider::new().then_text("Hello!"));

        let outcome = session.submit("hi").await.unwrap();

        assert_eq!(outcome.states, [LoopState::AwaitingFirstCompletion, LoopState::Idle]);
        assert_eq!(outcome.reply, "Hello!");
        assert!(outcome.tool_call.is_none());
        assert!(tools.calls.lock().unwrap().is_empty());
        assert_eq!(provider.call_count(), 1);
        assert_eq!(session.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_completion_failure_becomes_reply() {
        let (mut session, _, _) = session(
            ScriptedProvider::new()
                .then_error("insufficient_quota")
                .then_text("Back online."),
        );

        let outcome = session.submit("hi").await.unwrap();
        assert!(outcome.failed);
        assert!(outcome.reply.contains("insufficient_quota"));
        assert_eq!(session.state(), LoopState::Idle);

        let next = session.submit("again").await.unwrap();
        assert_eq!(next.reply, "Back online.");
    }

    #[tokio::test]
    async fn test_bad_arguments_skip_dispatch() {
        let (mut session, _, tools) = session(
            ScriptedProvider::new()
                .then_turn(AssistantTurn::tool_call(ToolCallIntent::new(
                    "list_sheets",
                    "{not json",
                )))
                .then_text("Sorry, something went wrong."),
        );

        let outcome = session.submit("list").await.unwrap();

        assert!(tools.calls.lock().unwrap().is_empty());
        let result = outcome.tool_result.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Invalid arguments for list_sheets"));
        assert_eq!(outcome.reply, "Sorry, something went wrong.");
        assert_eq!(session.transcript().tool_messages_for("list_sheets"), 1);
    }

    #[tokio::test]
    async fn test_second_tool_call_not_honored() {
        let (mut session, _, tools) = session(
            ScriptedProvider::new()
                .then_tool_call("list_sheets", json!({}))
                .then_tool_call("list_sheets", json!({})),
        );

        let outcome = session.submit("list twice").await.unwrap();
        assert_eq!(outcome.reply, SECOND_TOOL_CALL_NOTICE);
        assert_eq!(tools.calls.lock().unwrap().len(), 1);
        assert_eq!(session.transcript().tool_messages_for("list_sheets"), 1);
    }
}
