//! Service Kit - Sheet Tools
//!
//! The closed tool set for the spreadsheet domain and the handler that runs it.

mod analyze;
mod details;
mod list;
mod summarize;

pub use analyze::AnalysisType;

use std::sync::Arc;

use async_trait::async_trait;
use mcp_core::{
    string_param, CompletionProvider, Parameters, Result, ToolDescriptor, ToolHandler, ToolKind,
};

use crate::api::SheetApi;

/// Rows included in prompts; larger sheets are truncated
pub(crate) const MAX_PROMPT_ROWS: usize = 100;

/// Tools offered by the spreadsheet domain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SheetTool {
    ListSheets,
    SheetDetails,
    Summarize,
    AnalyzeProject,
}

impl ToolKind for SheetTool {
    fn all() -> &'static [Self] {
        &[
            SheetTool::ListSheets,
            SheetTool::SheetDetails,
            SheetTool::Summarize,
            SheetTool::AnalyzeProject,
        ]
    }

    fn descriptor(self) -> ToolDescriptor {
        match self {
            SheetTool::ListSheets => list::descriptor(),
            SheetTool::SheetDetails => details::descriptor(),
            SheetTool::Summarize => summarize::descriptor(),
            SheetTool::AnalyzeProject => analyze::descriptor(),
        }
    }
}

/// Runs sheet tools against a sheet source and a completion provider
pub struct SheetToolHandler {
    api: Arc<dyn SheetApi>,
    completions: Arc<dyn CompletionProvider>,
}

impl SheetToolHandler {
    pub fn new(api: Arc<dyn SheetApi>, completions: Arc<dyn CompletionProvider>) -> Self {
        Self { api, completions }
    }
}

/// The validated `sheetId` argument
fn sheet_id(parameters: &Parameters) -> String {
    string_param(parameters, "sheetId").unwrap_or_default()
}

#[async_trait]
impl ToolHandler<SheetTool> for SheetToolHandler {
    async fn handle(&self, tool: SheetTool, parameters: &Parameters) -> Result<serde_json::Value> {
        let api = self.api.as_ref();
        let completions = self.completions.as_ref();
        match tool {
            SheetTool::ListSheets => list::run(api).await,
            SheetTool::SheetDetails => details::run(api, &sheet_id(parameters)).await,
            SheetTool::Summarize => {
                summarize::run(api, completions, &sheet_id(parameters)).await
            }
            SheetTool::AnalyzeProject => {
                analyze::run(api, completions, &sheet_id(parameters), parameters).await
            }
        }
    }
}
