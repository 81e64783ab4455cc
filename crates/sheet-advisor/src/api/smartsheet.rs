//! Smartsheet REST Client

use std::time::Duration;

use async_trait::async_trait;
use mcp_core::{
    config::{self, process_env},
    numeric_id, AgentError, ResourceProvider,
};
use serde::de::DeserializeOwned;

use super::SheetApi;
use crate::error::{Result, SheetApiError};
use crate::model::{Sheet, SheetList};

/// Smartsheet client configuration
#[derive(Clone, Debug)]
pub struct SmartsheetConfig {
    /// Bearer token; without it every request fails with a configuration error
    pub api_key: Option<String>,

    pub base_url: String,

    pub timeout: Duration,
}

impl Default for SmartsheetConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.smartsheet.com/2.0".into(),
            timeout: Duration::from_secs(config::DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl SmartsheetConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: config::non_empty(&lookup, "SMARTSHEET_API_KEY")
                .or_else(|| config::non_empty(&lookup, "SMARTSHEET_STAGING_API_KEY")),
            base_url: config::non_empty(&lookup, "SMARTSHEET_BASE_URL")
                .unwrap_or(defaults.base_url),
            timeout: config::upstream_timeout(&lookup),
        }
    }
}

/// HTTP client for the Smartsheet API
pub struct SmartsheetClient {
    client: reqwest::Client,
    config: SmartsheetConfig,
}

impl SmartsheetClient {
    pub fn from_config(config: SmartsheetConfig) -> mcp_core::Result<Self> {
        if config.api_key.is_none() {
            tracing::warn!("SMARTSHEET_API_KEY not set; sheet tools will fail until it is configured");
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> mcp_core::Result<Self> {
        Self::from_config(SmartsheetConfig::from_env())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let Some(key) = &self.config.api_key else {
            return Err(SheetApiError::Config("SMARTSHEET_API_KEY is not set".into()));
        };

        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(%url, "Fetching from Smartsheet");

        let resp = self.client.get(&url).bearer_auth(key).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ResourceProvider for SmartsheetClient {
    type Collection = SheetList;
    type Item = Sheet;

    fn name(&self) -> &str {
        "Smartsheet"
    }

    fn has_credentials(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn fetch_collection(&self, _filter: Option<&str>) -> mcp_core::Result<SheetList> {
        let list: SheetList = self.get("sheets").await.map_err(|e| e.context("sheets"))?;
        tracing::info!(count = list.total_count, "Retrieved sheets");
        Ok(list)
    }

    async fn fetch_item(&self, id: &str) -> mcp_core::Result<Sheet> {
        let id = numeric_id(id, "Sheet ID")?;
        self.get(&format!("sheets/{id}"))
            .await
            .map_err(|e| e.context("sheet"))
    }
}

impl SheetApi for SmartsheetClient {}
