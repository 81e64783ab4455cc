//! Service Kit - Dog Tools
//!
//! The closed tool set for the dog domain and the handler that runs it.

mod breed_match;
mod care_tips;
mod description;

use std::sync::Arc;

use async_trait::async_trait;
use mcp_core::{CompletionProvider, Parameters, Result, ToolDescriptor, ToolHandler, ToolKind};

use crate::api::DogApi;

/// Tools offered by the dog domain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DogTool {
    Description,
    CareTips,
    BreedMatch,
}

impl ToolKind for DogTool {
    fn all() -> &'static [Self] {
        &[DogTool::Description, DogTool::CareTips, DogTool::BreedMatch]
    }

    fn descriptor(self) -> ToolDescriptor {
        match self {
            DogTool::Description => description::descriptor(),
            DogTool::CareTips => care_tips::descriptor(),
            DogTool::BreedMatch => breed_match::descriptor(),
        }
    }
}

/// Runs dog tools against a breed source and a completion provider
pub struct DogToolHandler {
    api: Arc<dyn DogApi>,
    completions: Arc<dyn CompletionProvider>,
}

impl DogToolHandler {
    pub fn new(api: Arc<dyn DogApi>, completions: Arc<dyn CompletionProvider>) -> Self {
        Self { api, completions }
    }
}

#[async_trait]
impl ToolHandler<DogTool> for DogToolHandler {
    async fn handle(&self, tool: DogTool, parameters: &Parameters) -> Result<serde_json::Value> {
        match tool {
            DogTool::Description => description::run(self.completions.as_ref(), parameters).await,
            DogTool::CareTips => care_tips::run(self.completions.as_ref(), parameters).await,
            DogTool::BreedMatch => {
                breed_match::run(self.api.as_ref(), self.completions.as_ref(), parameters).await
            }
        }
    }
}
