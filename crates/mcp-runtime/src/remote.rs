//! Remote Dispatcher
//!
//! `ToolDispatch` over a running gateway's `/mcp` endpoints, so a chat client
//! can drive tools hosted by another process.

use std::time::Duration;

use async_trait::async_trait;
use mcp_core::{
    config,
    error::{AgentError, Result},
    tool::{Parameters, ToolDescriptor, ToolInvocationRequest, ToolInvocationResult},
    ToolDispatch,
};
use serde::Deserialize;

/// Dispatcher that forwards every call to `POST {base_url}/mcp/execute`
pub struct RemoteDispatcher {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl RemoteDispatcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(
            base_url,
            Duration::from_secs(config::DEFAULT_UPSTREAM_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_descriptors(&self) -> reqwest::Result<Vec<ToolDescriptor>> {
        self.client
            .get(format!("{}/mcp/tools", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn post_execute(&self, request: &ToolInvocationRequest) -> reqwest::Result<ToolInvocationResult> {
        let resp = self
            .client
            .post(format!("{}/mcp/execute", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return resp.json().await;
        }

        let text = resp.text().await.unwrap_or_default();
        let error = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("MCP server answered {status}"));
        Ok(ToolInvocationResult::failure(error))
    }
}

#[async_trait]
impl ToolDispatch for RemoteDispatcher {
    async fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.fetch_descriptors().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load tool descriptors from MCP server");
            Vec::new()
        })
    }

    async fn invoke(&self, name: &str, parameters: &Parameters) -> ToolInvocationResult {
        tracing::info!(tool = %name, "Calling MCP tool");
        let request = ToolInvocationRequest::new(name, parameters.clone());

        match self.post_execute(&request).await {
            Ok(result) => {
                if let Some(error) = &result.error {
                    tracing::warn!(tool = %name, error = %error, "MCP returned an error");
                }
                result
            }
            Err(e) => {
                tracing::error!(tool = %name, error = %e, "Error calling MCP");
                ToolInvocationResult::failure(format!("Failed to connect to MCP server: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let remote = RemoteDispatcher::new("http://localhost:3000/").unwrap();
        assert_eq!(remote.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_unreachable_server_yields_failure_envelope() {
        // Port 9 (discard) is not expected to run an HTTP server
        let remote =
            RemoteDispatcher::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        let result = remote.invoke("list_sheets", &Parameters::new()).await;
        assert!(!result.success);
        assert!(result
            .error
            .unwrap()
            .starts_with("Failed to connect to MCP server"));
        assert!(remote.descriptors().await.is_empty());
    }
}
