//! Sheet Details Tool

use mcp_core::{ParameterSchema, Result, ToolDescriptor};
use serde_json::Value;

use crate::api::SheetApi;

pub(super) fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "get_sheet_details",
        "Get details of a specific Smartsheet sheet by ID",
        vec![ParameterSchema::required("sheetId", "string", "The ID of the sheet").labeled("Sheet ID")],
    )
}

pub(super) async fn run(api: &dyn SheetApi, sheet_id: &str) -> Result<Value> {
    let sheet = api.sheet(sheet_id).await?;
    Ok(serde_json::to_value(sheet)?)
}
