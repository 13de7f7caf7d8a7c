//! Tool definition types.

use serde::{Deserialize, Serialize};

/// Separator between server id and local tool name.
pub const QUALIFIED_NAME_SEPARATOR: char = '-';

/// Build the dispatch identity of a server-local tool.
pub fn qualified_name(server_id: &str, tool: &str) -> String {
    format!("{}{}{}", server_id, QUALIFIED_NAME_SEPARATOR, tool)
}

/// A tool as advertised by its own server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Server-local name.
    pub name: String,

    /// Description of what the tool does.
    #[serde(default)]
    pub description: String,

    /// JSON Schema for the input.
    pub input_schema: serde_json::Value,
}

impl ToolSpec {
    /// Create a new tool spec with an empty object schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::json!({"type": "object", "properties": {}}),
        }
    }

    /// Set the input schema.
    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = schema;
        self
    }
}

/// A tool in the aggregated catalog sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCatalogEntry {
    pub qualified_name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolCatalogEntry {
    /// Namespace a server-local tool under its server id.
    pub fn qualify(server_id: &str, spec: ToolSpec) -> Self {
        Self {
            qualified_name: qualified_name(server_id, &spec.name),
            description: spec.description,
            input_schema: spec.input_schema,
        }
    }
}

/// What a server returns for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name("sandbox", "execute"), "sandbox-execute");
    }

    #[test]
    fn test_qualify_keeps_schema() {
        let spec = ToolSpec::new("append", "Append text").with_input_schema(serde_json::json!({
            "type": "object",
            "properties": {"new_str": {"type": "string"}}
        }));
        let entry = ToolCatalogEntry::qualify("instructions", spec);
        assert_eq!(entry.qualified_name, "instructions-append");
        assert_eq!(entry.description, "Append text");
        assert!(entry.input_schema["properties"]["new_str"].is_object());
    }

    #[test]
    fn test_tool_output_constructors() {
        assert!(!ToolOutput::success("ok").is_error);
        assert!(ToolOutput::error("bad").is_error);
    }
}
