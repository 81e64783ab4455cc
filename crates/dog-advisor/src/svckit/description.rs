//! Breed Description Tool
//!
//! Free-text description of a breed, optionally steered by characteristics.

use mcp_core::{
    complete_text, string_param, CompletionProvider, ParameterSchema, Parameters, Result,
    ToolDescriptor,
};
use serde_json::{json, Value};

const SYSTEM: &str =
    "You are a helpful assistant that provides detailed information about dog breeds.";

const FALLBACK: &str = "Unable to generate description";

pub(super) fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "get_dog_description",
        "Generate a description for a dog breed",
        vec![
            ParameterSchema::required("breed", "string", "The name of the dog breed")
                .labeled("Breed"),
            ParameterSchema::optional(
                "characteristics",
                "array",
                "Specific characteristics to include in the description",
            ),
        ],
    )
}

/// Characteristics given either as a list or as a comma-separated string
fn characteristics(parameters: &Parameters) -> Vec<String> {
    match parameters.get("characteristics") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn prompt(breed: &str, characteristics: &[String]) -> String {
    let with = if characteristics.is_empty() {
        String::new()
    } else {
        format!(" with the following characteristics: {}", characteristics.join(", "))
    };
    format!(
        "Generate a detailed and engaging description of a {breed} dog{with}.\n\
         Include information about their temperament, physical characteristics, \
         and what makes them unique."
    )
}

pub(super) async fn run(completions: &dyn CompletionProvider, parameters: &Parameters) -> Result<Value> {
    let breed = string_param(parameters, "breed").unwrap_or_default();
    let prompt = prompt(&breed, &characteristics(parameters));

    tracing::debug!(%breed, "Generating breed description");
    let description = complete_text(completions, SYSTEM, &prompt)
        .await?
        .unwrap_or_else(|| FALLBACK.into());

    Ok(json!({ "description": description }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_characteristics() {
        let mut params = Parameters::new();
        params.insert("characteristics".into(), json!(["friendly", "small"]));
        let text = prompt("Beagle", &characteristics(&params));
        assert!(text.starts_with(
            "Generate a detailed and engaging description of a Beagle dog with the following characteristics: friendly, small."
        ));

        let plain = prompt("Pug", &[]);
        assert!(plain.starts_with("Generate a detailed and engaging description of a Pug dog."));
    }

    #[test]
    fn test_characteristics_from_string() {
        let mut params = Parameters::new();
        params.insert("characteristics".into(), json!("loyal, calm ,"));
        assert_eq!(characteristics(&params), vec!["loyal", "calm"]);
    }
}
