//! # dog-advisor
//!
//! Dog domain for the MCP gateway: a TheDogAPI resource provider and the
//! three breed tools (description, care tips, breed matching).
//!
//! ```text
//! get_dog_description ──▶ CompletionProvider
//! get_dog_care_tips   ──▶ CompletionProvider
//! get_breed_match     ──▶ DogApi::breeds ──▶ CompletionProvider (JSON)
//! ```

pub mod api;
pub mod error;
pub mod model;
pub mod svckit;

use std::sync::Arc;

use mcp_core::{CompletionProvider, Dispatcher, ResourceDescriptor, Result};

pub use api::{DogApi, DogApiConfig, MockDogApi, TheDogApiClient};
pub use error::DogApiError;
pub use model::{BreedSummary, DogBreed, DogImage, Measurement};
pub use svckit::{DogTool, DogToolHandler};

/// Dispatcher over the dog tool set
pub type DogDispatcher = Dispatcher<DogTool, DogToolHandler>;

/// System prompt for the dog chat assistant
pub const DOG_ASSISTANT_PROMPT: &str =
    "You are a helpful assistant that can provide information about dogs using the available tools.";

/// Resources listed by `GET /mcp/resources`
pub fn resources() -> Vec<ResourceDescriptor> {
    vec![
        ResourceDescriptor::new("dog_breeds", "Information about dog breeds", "/api/dogs/breeds"),
        ResourceDescriptor::new("random_dog", "Get a random dog image", "/api/dogs/random"),
        ResourceDescriptor::new(
            "breed_images",
            "Get images for a specific breed",
            "/api/dogs/breeds/{breedId}/images",
        ),
    ]
}

/// Build the dog dispatcher
pub fn dispatcher(
    api: Arc<dyn DogApi>,
    completions: Arc<dyn CompletionProvider>,
) -> Result<DogDispatcher> {
    Dispatcher::new(DogToolHandler::new(api, completions))
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

    fn setup(provider: ScriptedProvider) -> (Arc<MockDogApi>, Arc<ScriptedProvider>, DogDispatcher) {
        let api = Arc::new(MockDogApi::new());
        let provider = Arc::new(provider);
        let dispatcher = dispatcher(api.clone(), provider.clone()).unwrap();
        (api, provider, dispatcher)
    }

    #[tokio::test]
    async fn test_beagle_description() {
        let (_, provider, dispatcher) = setup(ScriptedProvider::new().then_text("Beagles are..."));

        let result = dispatcher
            .invoke("get_dog_description", &params(json!({"breed": "Beagle"})))
            .await;

        assert!(result.success);
        assert_eq!(result.data, Some(json!({"description": "Beagles are..."})));
        assert!(result.error.is_none());

        let request = &provider.requests()[0];
        assert!(request.tools.is_empty());
        assert!(request.messages[1].text().contains("a Beagle dog"));
    }

    #[tokio::test]
    async fn test_empty_completion_falls_back() {
        let (_, _, dispatcher) = setup(ScriptedProvider::new().then_text(""));

        let result = dispatcher
            .invoke("get_dog_care_tips", &params(json!({"breed": "Pug", "age": "2 years"})))
            .await;

        assert_eq!(result.data, Some(json!({"careTips": "Unable to generate care tips"})));
    }

    #[tokio::test]
    async fn test_missing_breed() {
        let (_, provider, dispatcher) = setup(ScriptedProvider::new());

        let result = dispatcher
            .invoke("get_dog_description", &params(json!({"characteristics": ["small"]})))
            .await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Breed is required"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_criteria_fetches_nothing() {
        let (api, provider, dispatcher) = setup(ScriptedProvider::new());

        let result = dispatcher.invoke("get_breed_match", &Parameters::new()).await;

        assert_eq!(result.error.as_deref(), Some("Criteria is required"));
        assert_eq!(api.fetch_count(), 0);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_breed_match() {
        let reply = r#"{"matches":[{"name":"Pug","reason":"small and calm"}]}"#;
        let (api, provider, dispatcher) = setup(ScriptedProvider::new().then_text(reply));

        let result = dispatcher
            .invoke("get_breed_match", &params(json!({"criteria": {"size": "small"}})))
            .await;

        assert!(result.success);
        assert_eq!(result.data.unwrap()["matches"][0]["name"], "Pug");
        assert_eq!(api.fetch_count(), 1);

        let request = &provider.requests()[0];
        assert_eq!(request.response_format, ResponseFormat::JsonObject);
        assert!(request.messages[1].text().contains("Border Collie"));
    }

    #[tokio::test]
    async fn test_breed_match_unparseable_reply() {
        let (_, _, dispatcher) = setup(ScriptedProvider::new().then_text("Try a Pug!"));

        let result = dispatcher
            .invoke("get_breed_match", &params(json!({"criteria": "small"})))
            .await;

        assert!(!result.success);
        assert!(result
            .error
            .unwrap()
            .starts_with("Could not parse model response as JSON"));
    }

    #[tokio::test]
    async fn test_completion_failure_becomes_envelope() {
        let (_, _, dispatcher) = setup(ScriptedProvider::new().then_error("quota exceeded"));

        let result = dispatcher
            .invoke("get_dog_care_tips", &params(json!({"breed": "Beagle"})))
            .await;

        assert_eq!(result.error.as_deref(), Some("Completion failed: quota exceeded"));
    }

    #[tokio::test]
    async fn test_descriptors_in_order() {
        let (_, _, dispatcher) = setup(ScriptedProvider::new());
        let names: Vec<String> = dispatcher
            .descriptors()
            .await
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["get_dog_description", "get_dog_care_tips", "get_breed_match"]);
        assert_eq!(resources().len(), 3);
    }
}
