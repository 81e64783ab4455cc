//! Error Types for TheDogAPI access

use mcp_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DogApiError>;

#[derive(Error, Debug)]
pub enum DogApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("TheDogAPI answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DogApiError {
    /// Attach the resource being fetched and convert to the gateway taxonomy
    pub fn context(self, resource: &str) -> AgentError {
        match self {
            DogApiError::Config(msg) => AgentError::Config(msg),
            other => AgentError::fetch(resource, other),
        }
    }
}
