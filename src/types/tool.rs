//! Tool calling definitions (OpenAI-compatible `tools` shape)

use serde::{Deserialize, Serialize};

/// Tool definition (for function calling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String, // "function"
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: Option<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description,
                parameters: Some(parameters),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>, // JSON Schema
}

/// Complete tool call as delivered by a non-streaming completion.
///
/// `arguments` is the raw JSON text exactly as the model produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// Tool call whose arguments parsed and passed schema validation.
///
/// Produced by the registry and consumed immediately by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedCall {
    pub id: String,
    pub name: String,
    pub args: serde_json::Value,
}

/// Tool result (response to tool call)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_use_id: String,
    pub name: String,
    pub content: serde_json::Value,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn ok(call: &ValidatedCall, content: serde_json::Value) -> Self {
        Self {
            tool_use_id: call.id.clone(),
            name: call.name.clone(),
            content,
            is_error: false,
        }
    }

    pub fn error(call: &ValidatedCall, message: impl Into<String>) -> Self {
        Self {
            tool_use_id: call.id.clone(),
            name: call.name.clone(),
            content: serde_json::Value::String(message.into()),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition_wire_shape() {
        let def = ToolDefinition::function(
            "provideLinks",
            Some("Provides links".to_string()),
            json!({"type": "object"}),
        );
        let v = serde_json::to_value(&def).unwrap();
        assert_eq!(v["type"], "function");
        assert_eq!(v["function"]["name"], "provideLinks");
        assert_eq!(v["function"]["description"], "Provides links");
        assert_eq!(v["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_tool_definition_omits_missing_description() {
        let def = ToolDefinition::function("t", None, json!({}));
        let v = serde_json::to_value(&def).unwrap();
        assert!(v["function"].get("description").is_none());
        assert_eq!(def.name(), "t");
    }

    #[test]
    fn test_tool_result_constructors() {
        let call = ValidatedCall {
            id: "call_1".into(),
            name: "provideLinks".into(),
            args: json!({}),
        };
        let ok = ToolResult::ok(&call, json!({"links": 2}));
        assert!(!ok.is_error);
        assert_eq!(ok.tool_use_id, "call_1");

        let err = ToolResult::error(&call, "boom");
        assert!(err.is_error);
        assert_eq!(err.content, json!("boom"));
    }
}
