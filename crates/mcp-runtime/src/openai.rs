//! OpenAI Completion Provider
//!
//! Implementation of `CompletionProvider` for the OpenAI chat completions API
//! (and compatible endpoints) using native tool calling.

use std::time::Duration;

use async_trait::async_trait;
use mcp_core::{
    config::{self, process_env},
    error::{AgentError, Result},
    message::{link_tool_calls, Message, Role, ToolCallIntent},
    provider::{
        AssistantTurn, CompletionProvider, CompletionRequest, GenerationOptions, ProviderInfo,
        ResponseFormat, ToolChoice,
    },
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{json, Value};

/// OpenAI provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API key (required)
    pub api_key: String,

    /// API base URL, without trailing `/chat/completions`
    pub base_url: String,

    /// Default model and token budget
    pub generation: GenerationOptions,

    /// Request timeout
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            generation: GenerationOptions::default(),
            timeout: Duration::from_secs(config::DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }

    /// Read `OPENAI_*` variables; a missing API key is an error
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = config::non_empty(&lookup, "OPENAI_API_KEY").ok_or_else(|| {
            AgentError::Config("OPENAI_API_KEY environment variable is not set".into())
        })?;

        let mut cfg = Self::new(api_key);
        if let Some(base_url) = config::non_empty(&lookup, "OPENAI_BASE_URL") {
            cfg.base_url = base_url;
        }
        if let Some(model) = config::non_empty(&lookup, "OPENAI_MODEL") {
            cfg.generation.model = model;
        }
        if let Some(max_tokens) =
            config::non_empty(&lookup, "OPENAI_MAX_TOKENS").and_then(|v| v.parse().ok())
        {
            cfg.generation.max_tokens = max_tokens;
        }
        cfg.timeout = config::upstream_timeout(&lookup);
        Ok(cfg)
    }
}

/// OpenAI chat completion provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| AgentError::Config(format!("invalid OPENAI_API_KEY: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env()?)
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Convert transcript messages to the chat completions wire format
    ///
    /// Tool calls and tool messages are paired by ID first; a tool message
    /// with no preceding call falls back to the legacy function role.
    fn convert_messages(messages: &[Message]) -> Vec<Value> {
        link_tool_calls(messages)
            .iter()
            .map(|m| match (m.role, &m.tool_call) {
                (Role::Assistant, Some(call)) => json!({
                    "role": "assistant",
                    "content": m.content,
                    "tool_calls": [{
                        "id": call.id,
                        "type": "function",
                        "function": { "name": call.name, "arguments": call.arguments },
                    }],
                }),
                (Role::Tool, _) => match &m.tool_call_id {
                    Some(id) => json!({
                        "role": "tool",
                        "tool_call_id": id,
                        "content": m.text(),
                    }),
                    None => json!({
                        "role": "function",
                        "name": m.tool_name,
                        "content": m.text(),
                    }),
                },
                (role, _) => json!({ "role": role.to_string(), "content": m.text() }),
            })
            .collect()
    }

    /// Build the request body
    fn build_body(&self, request: &CompletionRequest<'_>) -> Value {
        let mut body = json!({
            "model": self.config.generation.model,
            "messages": Self::convert_messages(request.messages),
            "max_tokens": request.max_tokens.unwrap_or(self.config.generation.max_tokens),
        });

        if let Some(temperature) = self.config.generation.temperature {
            body["temperature"] = json!(temperature);
        }

        if !request.tools.is_empty() {
            body["tools"] = request
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.json_schema(),
                        },
                    })
                })
                .collect();
            body["tool_choice"] = match &request.tool_choice {
                ToolChoice::Auto => json!("auto"),
                ToolChoice::None => json!("none"),
                ToolChoice::Tool { name } => json!({ "type": "function", "function": { "name": name } }),
            };
            body["parallel_tool_calls"] = json!(false);
        }

        if request.response_format == ResponseFormat::JsonObject {
            body["response_format"] = json!({ "type": "json_object" });
        }

        body
    }

    /// Convert the first choice to an assistant turn
    fn convert_response(response: ChatResponse) -> Result<AssistantTurn> {
        let message = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| AgentError::Completion("response contained no choices".into()))?;

        let mut calls = message.tool_calls.unwrap_or_default().into_iter();
        if let Some(first) = calls.next() {
            let extra = calls.count();
            if extra > 0 {
                tracing::warn!(extra, "Model returned parallel tool calls; honoring the first");
            }
            let intent = ToolCallIntent::new(first.function.name, first.function.arguments);
            return Ok(AssistantTurn::tool_call(match first.id {
                Some(id) => intent.with_id(id),
                None => intent,
            }));
        }

        if let Some(function) = message.function_call {
            return Ok(AssistantTurn::tool_call(ToolCallIntent::new(
                function.name,
                function.arguments,
            )));
        }

        Ok(AssistantTurn::text(message.content.unwrap_or_default()))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "OpenAI".into(),
            model: self.config.generation.model.clone(),
            supports_tools: true,
        }
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.get(self.endpoint("models")).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => {
                tracing::warn!("OpenAI health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<AssistantTurn> {
        if request.messages.is_empty() {
            return Err(AgentError::InvalidRequest("transcript is empty".into()));
        }

        let body = self.build_body(&request);
        tracing::debug!(
            model = %self.config.generation.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Requesting completion"
        );

        let resp = self
            .client
            .post(self.endpoint("chat/completions"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Completion(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AgentError::Completion(format!("{status}: {text}")));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| AgentError::Completion(format!("malformed response: {e}")))?;

        Self::convert_response(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
    function_call: Option<WireFunction>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: Option<String>,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_core::tool::{ParameterSchema, ToolDescriptor};
    use std::collections::HashMap;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::from_config(OpenAiConfig::new("sk-test")).unwrap()
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = OpenAiConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-abc"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .collect();
        let cfg = OpenAiConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();

        assert_eq!(cfg.generation.model, "gpt-4o-mini");
        assert_eq!(cfg.generation.max_tokens, 500);
        assert_eq!(cfg.base_url, "http://localhost:8080/v1");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_message_conversion() {
        let call = ToolCallIntent::new("get_dog_description", r#"{"breed":"Beagle"}"#)
            .with_id("call_1");
        let messages = vec![
            Message::system("You are helpful."),
            Message::user("Describe a beagle"),
            Message::assistant_tool_call(call.clone()),
            Message::tool(&call, r#"{"success":true}"#),
        ];

        let converted = OpenAiProvider::convert_messages(&messages);
        assert_eq!(converted.len(), 4);
        assert_eq!(converted[2]["tool_calls"][0]["function"]["name"], "get_dog_description");
        assert_eq!(converted[2]["content"], Value::Null);
        assert_eq!(converted[3]["role"], "tool");
        assert_eq!(converted[3]["tool_call_id"], "call_1");
    }

    #[test]
    fn test_conversion_pairs_calls_without_ids() {
        let messages: Vec<Message> = serde_json::from_value(json!([
            {"role": "user", "content": "Describe a beagle"},
            {"role": "assistant", "toolCall": {"name": "get_dog_description", "arguments": "{\"breed\":\"Beagle\"}"}},
            {"role": "tool", "toolName": "get_dog_description", "content": "{\"success\":true}"}
        ]))
        .unwrap();

        let converted = OpenAiProvider::convert_messages(&messages);

        let id = converted[1]["tool_calls"][0]["id"].as_str().unwrap();
        assert!(id.starts_with("call_"));
        assert_eq!(converted[2]["role"], "tool");
        assert_eq!(converted[2]["tool_call_id"], id);
        assert!(converted.iter().all(|m| m["role"] != "function"));
    }

    #[test]
    fn test_body_advertises_tools_only_when_present() {
        let provider = provider();
        let messages = [Message::user("hi")];
        let tools = [ToolDescriptor::new(
            "get_sheet_details",
            "Get a sheet",
            vec![ParameterSchema::required("sheetId", "string", "Sheet ID")],
        )];

        let plain = provider.build_body(&CompletionRequest::new(&messages).json());
        assert!(plain.get("tools").is_none());
        assert!(plain.get("tool_choice").is_none());
        assert_eq!(plain["response_format"]["type"], "json_object");
        assert_eq!(plain["max_tokens"], 500);

        let with_tools = provider.build_body(
            &CompletionRequest::new(&messages)
                .with_tools(&tools)
                .max_tokens(50),
        );
        assert_eq!(with_tools["tool_choice"], "auto");
        assert_eq!(with_tools["parallel_tool_calls"], false);
        assert_eq!(
            with_tools["tools"][0]["function"]["parameters"]["required"],
            json!(["sheetId"])
        );
        assert_eq!(with_tools["max_tokens"], 50);
    }

    #[test]
    fn test_response_prefers_first_tool_call() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [
                        {"id": "a", "type": "function", "function": {"name": "list_sheets", "arguments": "{}"}},
                        {"id": "b", "type": "function", "function": {"name": "get_sheet_details", "arguments": "{}"}}
                    ]
                }
            }]
        }))
        .unwrap();

        let turn = OpenAiProvider::convert_response(response).unwrap();
        assert_eq!(
            turn,
            AssistantTurn::tool_call(ToolCallIntent::new("list_sheets", "{}").with_id("a"))
        );
    }

    #[test]
    fn test_response_text_and_empty_choices() {
        let response: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": "Woof"}}]})).unwrap();
        assert_eq!(
            OpenAiProvider::convert_response(response).unwrap(),
            AssistantTurn::text("Woof")
        );

        let empty: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            OpenAiProvider::convert_response(empty),
            Err(AgentError::Completion(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_transcript_rejected_before_request() {
        let result = provider().complete(CompletionRequest::new(&[])).await;
        assert!(matches!(result, Err(AgentError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_health_check_reports_unreachable_endpoint() {
        let mut config = OpenAiConfig::new("sk-test");
        config.base_url = "http://127.0.0.1:9/v1".into();
        config.timeout = Duration::from_secs(1);
        let provider = OpenAiProvider::from_config(config).unwrap();

        assert!(!provider.health_check().await.unwrap());
    }
}
