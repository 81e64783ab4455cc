//! Tool Dispatcher
//!
//! Turns a tool name and keyword arguments into a [`ToolInvocationResult`].
//! Every failure (unknown tool, missing parameter, upstream error, parse
//! error) comes back as `success: false` with a readable message; nothing
//! escapes as an `Err`.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::tool::{
    Parameters, ToolDescriptor, ToolHandler, ToolInvocationRequest, ToolInvocationResult,
    ToolKind, ToolRegistry,
};

/// Object-safe dispatch interface used by the conversation loop and the
/// HTTP layer
#[async_trait]
pub trait ToolDispatch: Send + Sync {
    /// Descriptors for every tool this dispatcher resolves
    async fn descriptors(&self) -> Vec<ToolDescriptor>;

    /// Invoke a tool by name
    async fn invoke(&self, name: &str, parameters: &Parameters) -> ToolInvocationResult;

    /// Invoke from a wire request
    async fn execute(&self, request: &ToolInvocationRequest) -> ToolInvocationResult {
        self.invoke(&request.tool_name, &request.parameters).await
    }
}

/// Dispatcher over one domain's closed tool set
pub struct Dispatcher<K: ToolKind, H> {
    registry: ToolRegistry<K>,
    handler: H,
}

impl<K: ToolKind, H: ToolHandler<K>> Dispatcher<K, H> {
    /// Build the registry for `K` and attach its handler
    pub fn new(handler: H) -> crate::Result<Self> {
        let registry = ToolRegistry::new()?;
        tracing::debug!(tools = ?registry.names(), "Tool registry built");
        Ok(Self { registry, handler })
    }

    pub fn registry(&self) -> &ToolRegistry<K> {
        &self.registry
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

#[async_trait]
impl<K: ToolKind, H: ToolHandler<K>> ToolDispatch for Dispatcher<K, H> {
    async fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.registry.descriptors()
    }

    async fn invoke(&self, name: &str, parameters: &Parameters) -> ToolInvocationResult {
        let Some((kind, descriptor)) = self.registry.resolve(name) else {
            tracing::warn!(tool = %name, "Unknown tool requested");
            return ToolInvocationResult::failure(AgentError::UnknownTool(name.into()).to_string());
        };

        if let Err(e) = descriptor.validate(parameters) {
            tracing::debug!(tool = %name, error = %e, "Tool parameters rejected");
            return ToolInvocationResult::failure(e.to_string());
        }

        tracing::debug!(tool = %name, "Executing tool");
        match self.handler.handle(kind, parameters).await {
            Ok(data) => ToolInvocationResult::success(data),
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "Tool failed");
                ToolInvocationResult::failure(e.to_string())
            }
        }
    }
}
