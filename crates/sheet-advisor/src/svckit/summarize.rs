//! Sheet Summary Tool

use mcp_core::{complete_text, CompletionProvider, ParameterSchema, Result, ToolDescriptor};
use serde_json::{json, Value};

use super::MAX_PROMPT_ROWS;
use crate::api::SheetApi;
use crate::model::Sheet;

const SYSTEM: &str =
    "You are a helpful assistant that summarizes spreadsheet data clearly and concisely.";

const FALLBACK: &str = "Unable to generate summary";

pub(super) fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "summarize_sheet",
        "Generate a summary of a Smartsheet sheet using OpenAI",
        vec![
            ParameterSchema::required("sheetId", "string", "The ID of the sheet to summarize")
                .labeled("Sheet ID"),
        ],
    )
}

fn prompt(sheet: &Sheet) -> Result<String> {
    let rows = serde_json::to_string(&sheet.records(MAX_PROMPT_ROWS))?;
    Ok(format!(
        "Summarize the Smartsheet sheet \"{name}\".\n\
         Columns: {columns}\n\
         Rows ({shown} of {total}): {rows}\n\n\
         Describe what the sheet tracks, its overall state, and anything notable.",
        name = sheet.name,
        columns = sheet.column_titles().join(", "),
        shown = sheet.rows.len().min(MAX_PROMPT_ROWS),
        total = sheet.total_row_count,
    ))
}

pub(super) async fn run(
    api: &dyn SheetApi,
    completions: &dyn CompletionProvider,
    sheet_id: &str,
) -> Result<Value> {
    let sheet = api.sheet(sheet_id).await?;

    tracing::debug!(sheet = %sheet.name, rows = sheet.rows.len(), "Summarizing sheet");
    let summary = complete_text(completions, SYSTEM, &prompt(&sheet)?)
        .await?
        .unwrap_or_else(|| FALLBACK.into());

    Ok(json!({
        "sheetId": sheet_id,
        "sheetName": sheet.name,
        "summary": summary,
    }))
}
