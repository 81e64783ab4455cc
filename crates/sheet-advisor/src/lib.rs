//! # sheet-advisor
//!
//! Spreadsheet domain for the MCP gateway: a Smartsheet resource provider
//! and four sheet tools.
//!
//! ```text
//! list_sheets       ──▶ SheetApi::list_sheets
//! get_sheet_details ──▶ SheetApi::sheet
//! summarize_sheet   ──▶ SheetApi::sheet ──▶ CompletionProvider
//! analyze_project   ──▶ SheetApi::sheet ──▶ CompletionProvider (JSON)
//! ```

pub mod api;
pub mod error;
pub mod model;
pub mod svckit;

use std::sync::Arc;

use mcp_core::{CompletionProvider, Dispatcher, ResourceDescriptor, Result};

pub use api::{MockSheetApi, SheetApi, SmartsheetClient, SmartsheetConfig};
pub use error::SheetApiError;
pub use model::{Cell, Column, Row, Sheet, SheetList, SheetSummary};
pub use svckit::{AnalysisType, SheetTool, SheetToolHandler};

/// Dispatcher over the sheet tool set
pub type SheetDispatcher = Dispatcher<SheetTool, SheetToolHandler>;

/// System prompt for the spreadsheet chat assistant
pub const SHEET_ASSISTANT_PROMPT: &str = "You are a helpful assistant that can provide information \
about Smartsheet data using the available tools. You can list sheets, get sheet details, generate \
summaries of sheets, and analyze project sheets to provide insights on status, risks, resources, \
and timelines. For project analysis, you should ask for the sheet ID and what type of analysis the \
user wants (status, risks, resources, timeline, or a comprehensive analysis).";

/// Resources listed by `GET /mcp/resources`
pub fn resources() -> Vec<ResourceDescriptor> {
    vec![
        ResourceDescriptor::new("sheets", "List of Smartsheet sheets", "/api/smartsheet/sheets"),
        ResourceDescriptor::new(
            "sheet_details",
            "Columns and rows of a specific sheet",
            "/api/smartsheet/sheets/{sheetId}",
        ),
    ]
}

/// Build the sheet dispatcher
pub fn dispatcher(
    api: Arc<dyn SheetApi>,
    completions: Arc<dyn CompletionProvider>,
) -> Result<SheetDispatcher> {
    Dispatcher::new(SheetToolHandler::new(api, completions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_core::mock::ScriptedProvider;
    use mcp_core::{Parameters, ResponseFormat, ToolDispatch};
    use serde_json::json;

    fn params(value: serde_json::Value) -> Parameters {
        value.as_object().cloned().unwrap_or_default()
    }

    fn setup(
        provider: ScriptedProvider,
    ) -> (Arc<MockSheetApi>, Arc<ScriptedProvider>, SheetDispatcher) {
        let api = Arc::new(MockSheetApi::new());
        let provider = Arc::new(provider);
        let dispatcher = dispatcher(api.clone(), provider.clone()).unwrap();
        (api, provider, dispatcher)
    }

    #[tokio::test]
    async fn test_sheet_details_requires_id() {
        let (api, provider, dispatcher) = setup(ScriptedProvider::new());

        let result = dispatcher.invoke("get_sheet_details", &Parameters::new()).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Sheet ID is required"));
        assert_eq!(api.fetch_count(), 0);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_and_details_pass_through() {
        let (_, _, dispatcher) = setup(ScriptedProvider::new());

        let list = dispatcher.invoke("list_sheets", &Parameters::new()).await;
        assert_eq!(list.data.unwrap()["totalCount"], 2);

        let details = dispatcher
            .invoke("get_sheet_details", &params(json!({"sheetId": 1001})))
            .await;
        let data = details.data.unwrap();
        assert_eq!(data["name"], "Website Launch");
        assert_eq!(data["rows"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_sheet_is_upstream_failure() {
        let (_, _, dispatcher) = setup(ScriptedProvider::new());

        let result = dispatcher
            .invoke("get_sheet_details", &params(json!({"sheetId": "42"})))
            .await;

        assert!(result.error.unwrap().starts_with("Failed to fetch sheet"));
    }

    #[tokio::test]
    async fn test_non_numeric_sheet_id_rejected_before_fetch() {
        let (api, provider, dispatcher) = setup(ScriptedProvider::new());

        let result = dispatcher
            .invoke("summarize_sheet", &params(json!({"sheetId": "../workspaces/7"})))
            .await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Invalid request: Sheet ID must be numeric, got '../workspaces/7'")
        );
        assert_eq!(api.fetch_count(), 0);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_summarize_sheet() {
        let (_, provider, dispatcher) =
            setup(ScriptedProvider::new().then_text("A launch plan with three tasks."));

        let result = dispatcher
            .invoke("summarize_sheet", &params(json!({"sheetId": "1001"})))
            .await;

        assert_eq!(
            result.data,
            Some(json!({
                "sheetId": "1001",
                "sheetName": "Website Launch",
                "summary": "A launch plan with three tasks.",
            }))
        );
        assert!(provider.requests()[0].messages[1].text().contains("Load testing"));
    }

    #[tokio::test]
    async fn test_analyze_empty_sheet() {
        let (_, provider, dispatcher) = setup(ScriptedProvider::new());

        let result = dispatcher
            .invoke("analyze_project", &params(json!({"sheetId": "2002"})))
            .await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("The sheet does not contain any rows to analyze")
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_project() {
        let reply = r#"{"summary":"On track","findings":[],"recommendations":["Assign load testing"]}"#;
        let (_, provider, dispatcher) = setup(ScriptedProvider::new().then_text(reply));

        let result = dispatcher
            .invoke(
                "analyze_project",
                &params(json!({"sheetId": "1001", "analysisType": "risks"})),
            )
            .await;

        let data = result.data.unwrap();
        assert_eq!(data["analysisType"], "risks");
        assert_eq!(data["analysis"]["summary"], "On track");
        assert_eq!(provider.requests()[0].response_format, ResponseFormat::JsonObject);
    }

    #[tokio::test]
    async fn test_analyze_defaults_to_all() {
        let (_, _, dispatcher) = setup(ScriptedProvider::new().then_text("{}"));

        let result = dispatcher
            .invoke("analyze_project", &params(json!({"sheetId": "1001"})))
            .await;

        assert_eq!(result.data.unwrap()["analysisType"], "all");
    }

    #[tokio::test]
    async fn test_analyze_rejects_unknown_type() {
        let (api, _, dispatcher) = setup(ScriptedProvider::new());

        let result = dispatcher
            .invoke(
                "analyze_project",
                &params(json!({"sheetId": "1001", "analysisType": "budget"})),
            )
            .await;

        assert!(result.error.unwrap().starts_with("Invalid analysis type"));
        assert_eq!(api.fetch_count(), 0);
    }
}
