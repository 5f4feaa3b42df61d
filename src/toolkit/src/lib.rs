//! Toolkit: Tool Abstraction Layer for the Agent
//!
//! This crate provides a trait-based abstraction for agent tools,
//! decoupling the ReAct loop from concrete tool implementations.
//!
//! Tools receive keyword arguments as plain strings (whatever the model wrote
//! inside `name(key="value", ...)`) and return a string that becomes the
//! observation payload.

mod registry;
mod tools;

pub use registry::ToolRegistry;
pub use tools::{AttractionTool, WeatherTool};

use error::{CompassError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keyword arguments of a tool call, keys unique
pub type ToolArgs = BTreeMap<String, String>;

/// Schema describing a tool's capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name (identifier)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Input schema (JSON Schema, all properties are strings)
    pub input_schema: serde_json::Value,
}

impl ToolSchema {
    /// Required parameter names, in declaration order
    pub fn required_params(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
            .unwrap_or_default()
    }

    /// All declared parameter names
    pub fn param_names(&self) -> Vec<&str> {
        self.input_schema
            .get("properties")
            .and_then(|v| v.as_object())
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Call-style signature, e.g. `get_weather(city: str)`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .required_params()
            .into_iter()
            .map(|p| format!("{p}: str"))
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

// ============================================================================
// Tool Trait
// ============================================================================

/// Abstract interface for agent tools
///
/// An `Err` from `invoke` is a tool execution failure and ends the current
/// run. Recoverable problems (network hiccups, empty results) should be
/// reported as an `Ok` message so the model can react to them.
pub trait Tool: Send + Sync {
    /// Get the tool's unique identifier
    fn name(&self) -> &str;

    /// Get the tool's schema
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given keyword arguments
    fn invoke(&self, args: &ToolArgs) -> Result<String>;
}

// ============================================================================
// Helper Functions for Tool Implementations
// ============================================================================

/// Fetch a required argument; the value is passed through untouched
pub fn required_arg<'a>(args: &'a ToolArgs, tool: &str, key: &str) -> Result<&'a str> {
    args.get(key)
        .map(String::as_str)
        .ok_or_else(|| CompassError::missing_arg(tool, key))
}

/// Reject keyword arguments the schema does not declare
pub fn check_declared_args(schema: &ToolSchema, args: &ToolArgs) -> Result<()> {
    let declared = schema.param_names();
    match args.keys().find(|key| !declared.contains(&key.as_str())) {
        Some(key) => Err(CompassError::unexpected_arg(&schema.name, key)),
        None => Ok(()),
    }
}

/// Build a JSON schema whose properties are all required strings
pub fn string_params_schema(params: &[(&str, &str)]) -> serde_json::Value {
    let properties: serde_json::Map<String, serde_json::Value> = params
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                serde_json::json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = params.iter().map(|(name, _)| *name).collect();

    serde_json::json!({
        "type": "object",
        "required": required,
        "properties": properties,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn attraction_schema() -> ToolSchema {
        ToolSchema {
            name: "get_attraction".to_string(),
            description: "d".to_string(),
            input_schema: string_params_schema(&[("city", "c"), ("weather", "w")]),
        }
    }

    #[test]
    fn test_required_arg() {
        let mut args = ToolArgs::new();
        args.insert("city".to_string(), " Paris ".to_string());
        args.insert("weather".to_string(), String::new());

        assert_eq!(required_arg(&args, "t", "city").unwrap(), " Paris ");
        assert_eq!(required_arg(&args, "t", "weather").unwrap(), "");
        let err = required_arg(&args, "t", "missing").unwrap_err();
        assert!(matches!(err, CompassError::Validation { .. }));
    }

    #[test]
    fn test_check_declared_args() {
        let schema = attraction_schema();
        let mut args = ToolArgs::new();
        args.insert("city".to_string(), "Paris".to_string());
        assert!(check_declared_args(&schema, &args).is_ok());

        args.insert("country".to_string(), "FR".to_string());
        let err = check_declared_args(&schema, &args).unwrap_err();
        assert!(err.to_string().contains("`country`"));
    }

    #[test]
    fn test_schema_signature() {
        let schema = attraction_schema();
        assert_eq!(schema.required_params(), vec!["city", "weather"]);
        assert_eq!(schema.param_names(), vec!["city", "weather"]);
        assert_eq!(schema.signature(), "get_attraction(city: str, weather: str)");
    }
}
