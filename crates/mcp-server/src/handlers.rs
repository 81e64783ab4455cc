//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use dog_advisor::{DogApi, DogBreed, DogImage};
use mcp_core::{
    AgentError, CompletionProvider, CompletionRequest, Message, Parameters, ResourceDescriptor,
    ToolChoice, ToolDescriptor, ToolDispatch, ToolInvocationRequest, ToolInvocationResult,
    link_tool_calls, string_param,
};
use sheet_advisor::{Sheet, SheetApi, SheetList};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub domain: &'static str,
    pub model: String,
    pub data_source_authenticated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a data source or provider failure to a response
///
/// Rejected input is a `400` with its reason; anything else is logged and
/// hidden behind `message`.
fn upstream_error(err: &AgentError, message: &str) -> ApiError {
    if let AgentError::InvalidRequest(_) = err {
        return api_error(StatusCode::BAD_REQUEST, err.to_string());
    }
    tracing::error!(error = %err, "{message}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Names of dispatcher tools to offer the model
    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub tool_choice: Option<ToolChoice>,
}

// ============================================================================
// MCP endpoints
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        domain: state.domain.as_str(),
        model: state.provider.info().model,
        data_source_authenticated: state.data_source_authenticated(),
    })
}

pub async fn list_resources(State(state): State<AppState>) -> Json<Vec<ResourceDescriptor>> {
    Json(state.resources.as_ref().clone())
}

pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.dispatcher.descriptors().await)
}

/// Run one tool through the dispatcher
///
/// Logical failures come back as `200` with `success: false`.
pub async fn execute_tool(
    State(state): State<AppState>,
    payload: Result<Json<ToolInvocationRequest>, JsonRejection>,
) -> Result<Json<ToolInvocationResult>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::error!(error = %e, "Error executing MCP tool");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to execute MCP tool")
    })?;

    if request.tool_name.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Tool name is required"));
    }

    Ok(Json(state.dispatcher.execute(&request).await))
}

/// Forward a transcript to the completion provider and return the raw
/// assistant message
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::warn!(error = %e, "Rejected chat request body");
        api_error(StatusCode::BAD_REQUEST, format!("Invalid chat request: {}", e.body_text()))
    })?;

    if payload.messages.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Messages array is required"));
    }

    let available = state.dispatcher.descriptors().await;
    let mut tools = Vec::with_capacity(payload.tools.len());
    for name in &payload.tools {
        let Some(descriptor) = available.iter().find(|d| &d.name == name) else {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                format!("Unknown tool: {name}"),
            ));
        };
        tools.push(descriptor.clone());
    }

    let messages = link_tool_calls(&payload.messages);
    let mut request = CompletionRequest::new(&messages).with_tools(&tools);
    if let Some(choice) = payload.tool_choice {
        request = request.tool_choice(choice);
    }

    let turn = state
        .provider
        .complete(request)
        .await
        .map_err(|e| upstream_error(&e, "Failed to process chat request"))?;

    Ok(Json(turn.to_message()))
}

// ============================================================================
// Dog endpoints
// ============================================================================

fn dog_api(state: &AppState) -> Result<&dyn DogApi, ApiError> {
    state
        .dogs
        .as_deref()
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Dog data is not enabled"))
}

pub async fn random_dog(
    State(state): State<AppState>,
) -> Result<Json<DogImage>, ApiError> {
    let image = dog_api(&state)?
        .random_image()
        .await
        .map_err(|e| upstream_error(&e, "Failed to fetch random dog"))?;
    Ok(Json(image))
}

pub async fn dog_breeds(
    State(state): State<AppState>,
) -> Result<Json<Vec<DogBreed>>, ApiError> {
    let breeds = dog_api(&state)?
        .breeds()
        .await
        .map_err(|e| upstream_error(&e, "Failed to fetch dog breeds"))?;
    Ok(Json(breeds))
}

pub async fn breed_images(
    State(state): State<AppState>,
    Path(breed_id): Path<u32>,
) -> Result<Json<Vec<DogImage>>, ApiError> {
    let images = dog_api(&state)?
        .images_by_breed(breed_id)
        .await
        .map_err(|e| upstream_error(&e, "Failed to fetch breed images"))?;
    Ok(Json(images))
}

/// Run a breed tool on behalf of a plain REST endpoint
async fn breed_tool(
    state: &AppState,
    tool: &str,
    parameters: &Parameters,
    failure: &str,
) -> Result<Json<serde_json::Value>, ApiError> {
    if string_param(parameters, "breed").is_none() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Breed is required"));
    }

    let result = state.dispatcher.invoke(tool, parameters).await;
    match (result.success, result.data) {
        (true, Some(data)) => Ok(Json(data)),
        _ => {
            tracing::error!(tool, error = ?result.error, "{failure}");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, failure))
        }
    }
}

pub async fn generate_description(
    State(state): State<AppState>,
    Json(parameters): Json<Parameters>,
) -> Result<Json<serde_json::Value>, ApiError> {
    breed_tool(
        &state,
        "get_dog_description",
        &parameters,
        "Failed to generate dog description",
    )
    .await
}

pub async fn generate_care_tips(
    State(state): State<AppState>,
    Json(parameters): Json<Parameters>,
) -> Result<Json<serde_json::Value>, ApiError> {
    breed_tool(
        &state,
        "get_dog_care_tips",
        &parameters,
        "Failed to generate dog care tips",
    )
    .await
}

// ============================================================================
// Sheet endpoints
// ============================================================================

fn sheet_api(state: &AppState) -> Result<&dyn SheetApi, ApiError> {
    state
        .sheets
        .as_deref()
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Sheet data is not enabled"))
}

pub async fn list_sheets(
    State(state): State<AppState>,
) -> Result<Json<SheetList>, ApiError> {
    let sheets = sheet_api(&state)?
        .list_sheets()
        .await
        .map_err(|e| upstream_error(&e, "Failed to fetch sheets"))?;
    Ok(Json(sheets))
}

pub async fn get_sheet(
    State(state): State<AppState>,
    Path(sheet_id): Path<String>,
) -> Result<Json<Sheet>, ApiError> {
    let sheet = sheet_api(&state)?
        .sheet(&sheet_id)
        .await
        .map_err(|e| upstream_error(&e, "Failed to fetch sheet"))?;
    Ok(Json(sheet))
}
