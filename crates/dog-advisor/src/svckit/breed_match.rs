//! Breed Matching Tool
//!
//! Sends the full breed catalogue plus the user's criteria to the model and
//! returns the model's JSON verbatim.

use mcp_core::{
    complete_json, CompletionProvider, ParameterSchema, Parameters, Result, ToolDescriptor,
};
use serde_json::{json, Value};

use crate::api::DogApi;
use crate::model::BreedSummary;

const SYSTEM: &str =
    "You are a helpful assistant that matches dog breeds to criteria. Return only valid JSON.";

pub(super) fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "get_breed_match",
        "Find dog breeds that match given criteria",
        vec![ParameterSchema::required(
            "criteria",
            "object",
            "Criteria for matching dog breeds (size, temperament, etc.)",
        )
        .labeled("Criteria")],
    )
}

fn prompt(catalogue: &str, criteria: &Value) -> String {
    format!(
        "Given the following dog breeds and their characteristics:\n{catalogue}\n\n\
         Find the top 3 dog breeds that best match the following criteria:\n{criteria}\n\n\
         Return the result as a JSON array with the breed name and a brief explanation \
         of why it matches."
    )
}

pub(super) async fn run(
    api: &dyn DogApi,
    completions: &dyn CompletionProvider,
    parameters: &Parameters,
) -> Result<Value> {
    let criteria = parameters.get("criteria").cloned().unwrap_or(Value::Null);

    let breeds = api.breeds().await?;
    let summaries: Vec<BreedSummary<'_>> = breeds.iter().map(BreedSummary::from).collect();
    let catalogue = serde_json::to_string(&summaries)?;

    tracing::debug!(breeds = breeds.len(), %criteria, "Matching breeds");
    let matches = complete_json(completions, SYSTEM, &prompt(&catalogue, &criteria))
        .await?
        .unwrap_or_else(|| json!({ "matches": [] }));

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_criteria() {
        let text = prompt("[]", &json!({"size": "small"}));
        assert!(text.contains("Find the top 3 dog breeds"));
        assert!(text.contains(r#"{"size":"small"}"#));
    }
}
