//! Error Types for Smartsheet access

use mcp_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SheetApiError>;

#[derive(Error, Debug)]
pub enum SheetApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Smartsheet answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SheetApiError {
    /// Attach the resource being fetched and convert to the gateway taxonomy
    pub fn context(self, resource: &str) -> AgentError {
        match self {
            SheetApiError::Config(msg) => AgentError::Config(msg),
            other => AgentError::fetch(resource, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_mapping() {
        let err = SheetApiError::Status {
            status: 404,
            body: "Not Found".into(),
        }
        .context("sheet");
        assert_eq!(err.to_string(), "Failed to fetch sheet: Smartsheet answered 404: Not Found");

        let err = SheetApiError::Config("SMARTSHEET_API_KEY is not set".into()).context("sheets");
        assert!(matches!(err, AgentError::Config(_)));
    }
}
