use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declaration of a tool that the LLM can invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

/// JSON schema of a tool's input object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String, // always "object"
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,
}

impl InputSchema {
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: Map::new(),
            required: Vec::new(),
        }
    }

    /// Add a property. `required` puts its name on the required list.
    pub fn property(
        mut self,
        name: &str,
        kind: &str,
        description: &str,
        required: bool,
    ) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": kind,
                "description": description,
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add an array-of-strings property.
    pub fn string_list(mut self, name: &str, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": "array",
                "items": { "type": "string" },
                "description": description,
            }),
        );
        self
    }
}

/// Result of dispatching one tool call, sent back to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub call_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: true,
        }
    }
}

/// Captured output of one shell command.
///
/// A non-zero `exit_code` is still a successful execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}
