//! Tool Registry for managing available tools

use crate::{AttractionTool, Tool, ToolSchema, WeatherTool};
use config::ToolsConfig;
use std::collections::HashMap;

/// Registry for managing available tools
///
/// Built once before a run and handed to the agent; the agent only reads it.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry with `get_weather` and `get_attraction`
    pub fn with_defaults(cfg: &ToolsConfig) -> error::Result<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(WeatherTool::new(cfg)?));
        registry.register(Box::new(AttractionTool::new(cfg)?));
        Ok(registry)
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool schemas, sorted by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolArgs;

    struct MockTool {
        name: String,
    }

    impl Tool for MockTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name.clone(),
                description: "mock tool".to_string(),
                input_schema: serde_json::json!({}),
            }
        }

        fn invoke(&self, _args: &ToolArgs) -> error::Result<String> {
            Ok("ok".to_string())
        }
    }

    fn mock(name: &str) -> Box<dyn Tool> {
        Box::new(MockTool {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_registry_register() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(mock("test"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("test").is_some());
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_registry_list_sorted() {
        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(mock(name));
        }

        let names: Vec<String> = registry.schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_registry_defaults() {
        let registry = ToolRegistry::with_defaults(&ToolsConfig::default()).unwrap();
        let names: Vec<String> = registry.schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["get_attraction", "get_weather"]);
    }
}
