//! Error Types

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Gateway error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Tool name not resolvable by the dispatcher
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Required tool parameter absent (carries the parameter label)
    #[error("{0} is required")]
    MissingParameter(String),

    /// External data source failed or answered with a non-2xx status
    #[error("Failed to fetch {resource}: {reason}")]
    UpstreamFetch { resource: String, reason: String },

    /// Completion endpoint failed (quota, malformed request, network)
    #[error("Completion failed: {0}")]
    Completion(String),

    /// Model returned non-JSON where structured output was requested
    #[error("Could not parse model response as JSON: {0}")]
    ResponseParse(String),

    /// Handler-level failure, reported verbatim
    #[error("{0}")]
    ToolExecution(String),

    /// Request rejected before reaching a provider
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Append would break transcript ordering
    #[error("Transcript error: {0}")]
    Transcript(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    pub fn fetch(resource: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::UpstreamFetch {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the failure originated in an external service
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AgentError::UpstreamFetch { .. } | AgentError::Completion(_)
        )
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}
