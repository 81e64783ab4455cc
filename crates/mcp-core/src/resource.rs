//! Resource Providers
//!
//! Read-only wrappers around external REST data sources.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// Entry in `GET /mcp/resources`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub name: String,
    pub description: String,
    pub endpoint: String,
}

impl ResourceDescriptor {
    pub fn new(name: &str, description: &str, endpoint: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Check that `id` is a numeric resource ID
///
/// Item IDs are placed in the request path, so anything but digits is
/// rejected before a request is built.
pub fn numeric_id<'a>(id: &'a str, label: &str) -> Result<&'a str> {
    let id = id.trim();
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(id)
    } else {
        Err(AgentError::InvalidRequest(format!("{label} must be numeric, got '{id}'")))
    }
}

/// Typed pass-through to one external data source
///
/// Implementations inject their API key, make exactly one request per call
/// and return the provider's payload unmodified. Network failures and
/// non-2xx answers surface as [`AgentError::UpstreamFetch`](crate::AgentError::UpstreamFetch);
/// nothing is retried.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    type Collection: Serialize + Send;
    type Item: Serialize + Send;

    /// Data source name, for logs
    fn name(&self) -> &str;

    /// Whether an API key was configured
    fn has_credentials(&self) -> bool;

    /// Fetch the collection, optionally narrowed by `filter`
    async fn fetch_collection(&self, filter: Option<&str>) -> Result<Self::Collection>;

    /// Fetch one item by ID
    async fn fetch_item(&self, id: &str) -> Result<Self::Item>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id() {
        assert_eq!(numeric_id(" 4583173393803140 ", "Sheet ID").unwrap(), "4583173393803140");

        for bad in ["", "../workspaces/7", "12/rows", "7?include=all", "-1", "%2e%2e"] {
            let err = numeric_id(bad, "Sheet ID").unwrap_err();
            assert!(matches!(err, AgentError::InvalidRequest(_)), "{bad}");
        }
        assert_eq!(
            numeric_id("abc", "Breed ID").unwrap_err().to_string(),
            "Invalid request: Breed ID must be numeric, got 'abc'"
        );
    }
}
