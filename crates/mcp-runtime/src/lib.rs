//! # mcp-runtime
//!
//! Runtime providers for the MCP gateway.
//!
//! ## Providers
//!
//! - **OpenAI** (default): chat completions with native tool calling; any
//!   OpenAI-compatible endpoint works through `OPENAI_BASE_URL`
//! - **Remote dispatch**: drive the tools of a running gateway over HTTP
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mcp_runtime::OpenAiProvider;
//!
//! let provider = Arc::new(OpenAiProvider::from_env()?);
//! let session = ConversationLoop::new(provider, dispatcher, LoopConfig::new(prompt));
//! ```

#[cfg(feature = "openai")]
pub mod openai;
pub mod remote;

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use remote::RemoteDispatcher;

// Re-export core types for convenience
pub use mcp_core::{
    AgentError, CompletionProvider, ConversationLoop, LoopConfig, Message, Result, Role,
    ToolDispatch,
};
