//! Care Tips Tool

use mcp_core::{
    complete_text, string_param, CompletionProvider, ParameterSchema, Parameters, Result,
    ToolDescriptor,
};
use serde_json::{json, Value};

const SYSTEM: &str =
    "You are a helpful assistant that provides detailed care tips for dog breeds.";

const FALLBACK: &str = "Unable to generate care tips";

pub(super) fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "get_dog_care_tips",
        "Generate care tips for a dog breed",
        vec![
            ParameterSchema::required("breed", "string", "The name of the dog breed")
                .labeled("Breed"),
            ParameterSchema::optional("age", "string", "The age of the dog"),
            ParameterSchema::optional("lifestyle", "string", "The lifestyle of the owner"),
        ],
    )
}

fn prompt(breed: &str, age: Option<&str>, lifestyle: Option<&str>) -> String {
    let mut text = format!("Generate care tips for a {breed} dog.");
    if let Some(age) = age {
        text.push_str(&format!(" The dog is {age} old."));
    }
    if let Some(lifestyle) = lifestyle {
        text.push_str(&format!(" The owner's lifestyle is {lifestyle}."));
    }
    text.push_str(
        "\nInclude information about exercise needs, grooming requirements, \
         dietary considerations, and health concerns.",
    );
    text
}

pub(super) async fn run(completions: &dyn CompletionProvider, parameters: &Parameters) -> Result<Value> {
    let breed = string_param(parameters, "breed").unwrap_or_default();
    let age = string_param(parameters, "age");
    let lifestyle = string_param(parameters, "lifestyle");

    tracing::debug!(%breed, ?age, ?lifestyle, "Generating care tips");
    let tips = complete_text(
        completions,
        SYSTEM,
        &prompt(&breed, age.as_deref(), lifestyle.as_deref()),
    )
    .await?
    .unwrap_or_else(|| FALLBACK.into());

    Ok(json!({ "careTips": tips }))
}
