//! Sheet Listing Tool

use mcp_core::{Result, ToolDescriptor};
use serde_json::Value;

use crate::api::SheetApi;

pub(super) fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "list_sheets",
        "Get a list of all available Smartsheet sheets",
        vec![],
    )
}

pub(super) async fn run(api: &dyn SheetApi) -> Result<Value> {
    let list = api.list_sheets().await?;
    Ok(serde_json::to_value(list)?)
}
