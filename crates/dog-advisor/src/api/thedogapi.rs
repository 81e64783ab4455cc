//! TheDogAPI HTTP Client

use std::time::Duration;

use async_trait::async_trait;
use mcp_core::{
    config::{self, process_env},
    numeric_id, AgentError, ResourceProvider,
};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::DogApi;
use crate::error::{DogApiError, Result};
use crate::model::{DogBreed, DogImage};

/// Images returned per breed lookup
const IMAGES_PER_BREED: u32 = 10;

/// TheDogAPI client configuration
#[derive(Clone, Debug)]
pub struct DogApiConfig {
    /// Sent as `x-api-key`; requests go out unauthenticated without it
    pub api_key: Option<String>,

    pub base_url: String,

    pub timeout: Duration,
}

impl Default for DogApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.thedogapi.com/v1".into(),
            timeout: Duration::from_secs(config::DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl DogApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: config::non_empty(&lookup, "DOG_API_KEY"),
            base_url: config::non_empty(&lookup, "DOG_API_BASE_URL").unwrap_or(defaults.base_url),
            timeout: config::upstream_timeout(&lookup),
        }
    }
}

/// HTTP client for TheDogAPI
pub struct TheDogApiClient {
    client: reqwest::Client,
    config: DogApiConfig,
}

impl TheDogApiClient {
    pub fn from_config(config: DogApiConfig) -> mcp_core::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| AgentError::Config(format!("invalid DOG_API_KEY: {e}")))?;
            headers.insert("x-api-key", value);
        } else {
            tracing::warn!("DOG_API_KEY not set; TheDogAPI requests are unauthenticated");
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> mcp_core::Result<Self> {
        Self::from_config(DogApiConfig::from_env())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(%url, "Fetching from TheDogAPI");

        let resp = self.client.get(&url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DogApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ResourceProvider for TheDogApiClient {
    type Collection = Vec<DogBreed>;
    type Item = DogBreed;

    fn name(&self) -> &str {
        "TheDogAPI"
    }

    fn has_credentials(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn fetch_collection(&self, filter: Option<&str>) -> mcp_core::Result<Vec<DogBreed>> {
        let result = match filter {
            Some(q) => self.get("breeds/search", &[("q", q.to_string())]).await,
            None => self.get("breeds", &[]).await,
        };
        result.map_err(|e| e.context("dog breeds"))
    }

    async fn fetch_item(&self, id: &str) -> mcp_core::Result<DogBreed> {
        let id = numeric_id(id, "Breed ID")?;
        self.get(&format!("breeds/{id}"), &[])
            .await
            .map_err(|e| e.context("dog breed"))
    }
}

#[async_trait]
impl DogApi for TheDogApiClient {
    async fn random_image(&self) -> mcp_core::Result<DogImage> {
        let images: Vec<DogImage> = self
            .get("images/search", &[])
            .await
            .map_err(|e| e.context("random dog"))?;
        images
            .into_iter()
            .next()
            .ok_or_else(|| DogApiError::NotFound("no image returned".into()).context("random dog"))
    }

    async fn images_by_breed(&self, breed_id: u32) -> mcp_core::Result<Vec<DogImage>> {
        self.get(
            "images/search",
            &[
                ("breed_id", breed_id.to_string()),
                ("limit", IMAGES_PER_BREED.to_string()),
            ],
        )
        .await
        .map_err(|e| e.context("breed images"))
    }
}
