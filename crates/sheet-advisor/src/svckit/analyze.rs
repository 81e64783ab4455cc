//! Project Analysis Tool
//!
//! Structured (JSON) analysis of a project sheet, focused on one aspect or
//! on all of them.

use std::fmt;
use std::str::FromStr;

use mcp_core::{
    complete_json, string_param, AgentError, CompletionProvider, ParameterSchema, Parameters,
    Result, ToolDescriptor,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::MAX_PROMPT_ROWS;
use crate::api::SheetApi;
use crate::model::Sheet;

const SYSTEM: &str = "You are a project management assistant that analyzes project sheets. \
                      Return only valid JSON.";

/// Aspect of a project to analyze
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Status,
    Risks,
    Resources,
    Timeline,
    #[default]
    All,
}

impl AnalysisType {
    pub const NAMES: [&'static str; 5] = ["status", "risks", "resources", "timeline", "all"];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisType::Status => "status",
            AnalysisType::Risks => "risks",
            AnalysisType::Resources => "resources",
            AnalysisType::Timeline => "timeline",
            AnalysisType::All => "all",
        }
    }

    fn focus(self) -> &'static str {
        match self {
            AnalysisType::Status => {
                "the overall project status: completed, in-progress and not-started work"
            }
            AnalysisType::Risks => "risks and issues such as overdue, blocked or unowned tasks",
            AnalysisType::Resources => "resource allocation: who owns which tasks and any overload",
            AnalysisType::Timeline => "the timeline: upcoming deadlines and slipped dates",
            AnalysisType::All => "status, risks, resources and timeline",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "status" => Ok(AnalysisType::Status),
            "risks" => Ok(AnalysisType::Risks),
            "resources" => Ok(AnalysisType::Resources),
            "timeline" => Ok(AnalysisType::Timeline),
            "all" => Ok(AnalysisType::All),
            other => Err(AgentError::ToolExecution(format!(
                "Invalid analysis type: {other}. Expected one of {}",
                AnalysisType::NAMES.join(", ")
            ))),
        }
    }
}

pub(super) fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "analyze_project",
        "Analyze project status and provide insights for a project sheet",
        vec![
            ParameterSchema::required("sheetId", "string", "The ID of the project sheet to analyze")
                .labeled("Sheet ID"),
            ParameterSchema::optional(
                "analysisType",
                "string",
                "Type of analysis to perform (status, risks, resources, timeline, or all)",
            )
            .one_of(&AnalysisType::NAMES)
            .with_default(json!("all")),
        ],
    )
}

fn prompt(sheet: &Sheet, analysis: AnalysisType) -> Result<String> {
    let rows = serde_json::to_string(&sheet.records(MAX_PROMPT_ROWS))?;
    Ok(format!(
        "Analyze the project sheet \"{name}\".\n\
         Columns: {columns}\n\
         Rows: {rows}\n\n\
         Focus on {focus}. Return a JSON object with a \"summary\" string, a \
         \"findings\" array and a \"recommendations\" array.",
        name = sheet.name,
        columns = sheet.column_titles().join(", "),
        focus = analysis.focus(),
    ))
}

pub(super) async fn run(
    api: &dyn SheetApi,
    completions: &dyn CompletionProvider,
    sheet_id: &str,
    parameters: &Parameters,
) -> Result<Value> {
    let analysis = string_param(parameters, "analysisType")
        .map(|s| s.parse::<AnalysisType>())
        .transpose()?
        .unwrap_or_default();

    let sheet = api.sheet(sheet_id).await?;
    if sheet.rows.is_empty() {
        return Err(AgentError::ToolExecution(
            "The sheet does not contain any rows to analyze".into(),
        ));
    }

    tracing::debug!(sheet = %sheet.name, %analysis, "Analyzing project");
    let result = complete_json(completions, SYSTEM, &prompt(&sheet, analysis)?)
        .await?
        .ok_or_else(|| AgentError::ResponseParse("empty response".into()))?;

    Ok(json!({
        "sheetId": sheet_id,
        "sheetName": sheet.name,
        "analysisType": analysis,
        "analysis": result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_type_parsing() {
        assert_eq!("Risks".parse::<AnalysisType>().unwrap(), AnalysisType::Risks);
        assert_eq!(AnalysisType::default(), AnalysisType::All);
        let err = "budget".parse::<AnalysisType>().unwrap_err();
        assert!(err.to_string().starts_with("Invalid analysis type: budget"));
        assert_eq!(serde_json::to_value(AnalysisType::Timeline).unwrap(), "timeline");
    }
}
