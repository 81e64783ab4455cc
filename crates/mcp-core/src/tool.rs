//! Tool System
//!
//! Tools are a closed set per domain: each domain declares an enum of tool
//! variants ([`ToolKind`]) and one handler object ([`ToolHandler`]) that maps
//! a variant to its behavior. The [`ToolRegistry`] indexes the variants by
//! name and is validated once at startup.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::{AgentError, Result};

/// Keyword arguments for a tool invocation
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Scalar parameter rendered as text; blank strings count as absent
pub fn string_param(parameters: &Parameters, name: &str) -> Option<String> {
    match parameters.get(name)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Name used in "<label> is required" messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Default value if not provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Enum of allowed values
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl ParameterSchema {
    fn new(name: &str, param_type: &str, description: &str, required: bool) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required,
            label: None,
            default: None,
            enum_values: None,
        }
    }

    pub fn required(name: &str, param_type: &str, description: &str) -> Self {
        Self::new(name, param_type, description, true)
    }

    pub fn optional(name: &str, param_type: &str, description: &str) -> Self {
        Self::new(name, param_type, description, false)
    }

    pub fn labeled(mut self, label: &str) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.enum_values = Some(values.iter().map(|v| serde_json::json!(v)).collect());
        self
    }

    /// Label shown when the parameter is missing
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    fn is_present_in(&self, parameters: &Parameters) -> bool {
        match parameters.get(&self.name) {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    fn json_schema(&self) -> serde_json::Value {
        let mut schema = serde_json::json!({
            "type": self.param_type,
            "description": self.description,
        });
        if self.param_type == "array" {
            schema["items"] = serde_json::json!({ "type": "string" });
        }
        if let Some(values) = &self.enum_values {
            schema["enum"] = serde_json::Value::Array(values.clone());
        }
        schema
    }
}

/// Tool definition (for LLM function calling and `/mcp/tools`)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions, in declaration order
    #[serde(default)]
    pub parameters: Vec<ParameterSchema>,
}

impl ToolDescriptor {
    pub fn new(name: &str, description: &str, parameters: Vec<ParameterSchema>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Check that every required parameter is present
    pub fn validate(&self, parameters: &Parameters) -> Result<()> {
        match self
            .parameters
            .iter()
            .find(|p| p.required && !p.is_present_in(parameters))
        {
            Some(missing) => Err(AgentError::MissingParameter(
                missing.display_label().to_string(),
            )),
            None => Ok(()),
        }
    }

    /// JSON Schema object describing the parameters
    pub fn json_schema(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Tool invocation request, as posted to `/mcp/execute`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocationRequest {
    #[serde(default)]
    pub tool_name: String,

    /// `null` is read as no parameters
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parameters: Parameters,
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Parameters, D::Error> {
    Ok(Option::<Parameters>::deserialize(deserializer)?.unwrap_or_default())
}

impl ToolInvocationRequest {
    pub fn new(tool_name: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            tool_name: tool_name.into(),
            parameters,
        }
    }
}

/// Uniform result envelope returned by every dispatch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolInvocationResult {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// JSON text injected into the transcript as a tool message
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"success":false,"error":"unserializable tool result: {e}"}}"#)
        })
    }
}

/// Closed set of tools offered by one domain
pub trait ToolKind:
    Copy + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync + 'static
{
    /// Every variant, in the order tools are advertised
    fn all() -> &'static [Self];

    /// Schema for this variant
    fn descriptor(self) -> ToolDescriptor;
}

/// Behavior behind a domain's tool variants
#[async_trait]
pub trait ToolHandler<K: ToolKind>: Send + Sync {
    /// Run `tool`; parameters have already passed required-field validation
    async fn handle(&self, tool: K, parameters: &Parameters) -> Result<serde_json::Value>;
}

/// Name index over a domain's tool variants
pub struct ToolRegistry<K: ToolKind> {
    entries: Vec<(K, ToolDescriptor)>,
    by_name: HashMap<String, usize>,
}

impl<K: ToolKind> ToolRegistry<K> {
    /// Index every variant of `K`, rejecting empty or duplicate names
    pub fn new() -> Result<Self> {
        let mut entries = Vec::with_capacity(K::all().len());
        let mut by_name = HashMap::new();

        for &kind in K::all() {
            let descriptor = kind.descriptor();
            if descriptor.name.is_empty() {
                return Err(AgentError::Config(format!("tool {kind:?} has an empty name")));
            }
            if by_name.insert(descriptor.name.clone(), entries.len()).is_some() {
                return Err(AgentError::Config(format!(
                    "duplicate tool name: {}",
                    descriptor.name
                )));
            }
            entries.push((kind, descriptor));
        }

        Ok(Self { entries, by_name })
    }

    /// Look up a tool by name
    pub fn resolve(&self, name: &str) -> Option<(K, &ToolDescriptor)> {
        self.by_name
            .get(name)
            .map(|&i| (self.entries[i].0, &self.entries[i].1))
    }

    /// Descriptors in declaration order
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.entries.iter().map(|(_, d)| d.clone()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, d)| d.name.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Clash {
        First,
        Second,
    }

    impl ToolKind for Clash {
        fn all() -> &'static [Self] {
            &[Clash::First, Clash::Second]
        }

        fn descriptor(self) -> ToolDescriptor {
            ToolDescriptor::new("same_name", &format!("{self:?}"), vec![])
        }
    }

    fn sheet_details() -> ToolDescriptor {
        ToolDescriptor::new(
            "get_sheet_details",
            "Get details of a specific sheet by ID",
            vec![
                ParameterSchema::required("sheetId", "string", "The ID of the sheet")
                    .labeled("Sheet ID"),
                ParameterSchema::optional("analysisType", "string", "Kind of analysis")
                    .one_of(&["status", "all"]),
            ],
        )
    }

    #[test]
    fn test_duplicate_names_rejected() {
        assert!(matches!(
            ToolRegistry::<Clash>::new(),
            Err(AgentError::Config(_))
        ));
    }

    #[test]
    fn test_validate_required() {
        let descriptor = sheet_details();

        let err = descriptor.validate(&Parameters::new()).unwrap_err();
        assert_eq!(err.to_string(), "Sheet ID is required");

        let mut params = Parameters::new();
        params.insert("sheetId".into(), json!(""));
        assert!(descriptor.validate(&params).is_err());
        params.insert("sheetId".into(), json!(null));
        assert!(descriptor.validate(&params).is_err());
        params.insert("sheetId".into(), json!(123));
        assert!(descriptor.validate(&params).is_ok());
    }

    #[test]
    fn test_string_param() {
        let mut params = Parameters::new();
        params.insert("age".into(), json!(3));
        params.insert("lifestyle".into(), json!("  active "));
        params.insert("blank".into(), json!(" "));
        assert_eq!(string_param(&params, "age").as_deref(), Some("3"));
        assert_eq!(string_param(&params, "lifestyle").as_deref(), Some("active"));
        assert_eq!(string_param(&params, "blank"), None);
        assert_eq!(string_param(&params, "missing"), None);
    }

    #[test]
    fn test_json_schema() {
        let schema = sheet_details().json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["sheetId"]));
        assert_eq!(schema["properties"]["analysisType"]["enum"], json!(["status", "all"]));
    }

    #[test]
    fn test_result_round_trip() {
        let ok = ToolInvocationResult::success(json!({"description": "Beagles are..."}));
        let text = serde_json::to_string(&ok).unwrap();
        assert!(!text.contains("error"));
        assert_eq!(serde_json::from_str::<ToolInvocationResult>(&text).unwrap(), ok);

        let failed = ToolInvocationResult::failure("Sheet ID is required");
        let text = failed.to_json_string();
        assert!(!text.contains("data"));
        let back: ToolInvocationResult = serde_json::from_str(&text).unwrap();
        assert_eq!(back, failed);
        assert!(!back.success && back.data.is_none());
    }

    #[test]
    fn test_request_with_null_parameters() {
        let request: ToolInvocationRequest =
            serde_json::from_value(json!({"toolName": "list_sheets", "parameters": null})).unwrap();
        assert_eq!(request.tool_name, "list_sheets");
        assert!(request.parameters.is_empty());

        let request: ToolInvocationRequest =
            serde_json::from_value(json!({"toolName": "list_sheets"})).unwrap();
        assert!(request.parameters.is_empty());

        assert!(serde_json::from_value::<ToolInvocationRequest>(
            json!({"toolName": "x", "parameters": [1]})
        )
        .is_err());
    }
}
