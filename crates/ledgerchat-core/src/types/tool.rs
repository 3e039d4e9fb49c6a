//! Tool-call protocol types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool description handed to the model for function calling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name (unique across the registry)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolSpec {
    /// Create a new tool spec
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier assigned by the model, unique within one reply
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Input arguments: usually a JSON object, but some providers hand
    /// back the arguments as an encoded string
    pub arguments: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Resolve the string-or-structured ambiguity of `arguments`.
    ///
    /// Structured values pass through unchanged. An encoded string is
    /// parsed as a JSON object; if it does not parse to one, the raw
    /// string passes through as a single `input` argument rather than
    /// failing the call.
    pub fn decoded_arguments(&self) -> Value {
        match &self.arguments {
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Value::Object(map),
                _ => serde_json::json!({ "input": raw }),
            },
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spec_creation() {
        let spec = ToolSpec::new("add_expense", "Add an expense to the ledger").with_schema(json!({
            "type": "object",
            "properties": {
                "amount": { "type": "number" },
                "category": { "type": "string" }
            },
            "required": ["amount", "category"]
        }));

        assert_eq!(spec.name, "add_expense");
        assert!(spec.input_schema.is_some());
    }

    #[test]
    fn test_structured_arguments_pass_through() {
        let call = ToolCall::new("c1", "add_expense", json!({"amount": 12.5, "category": "Food"}));
        assert_eq!(call.decoded_arguments(), json!({"amount": 12.5, "category": "Food"}));
    }

    #[test]
    fn test_encoded_string_arguments_are_parsed() {
        let call = ToolCall::new(
            "c1",
            "add_expense",
            json!("{\"amount\": 12.5, \"category\": \"Food\"}"),
        );
        assert_eq!(call.decoded_arguments(), json!({"amount": 12.5, "category": "Food"}));
    }

    #[test]
    fn test_undecodable_string_falls_back_to_raw() {
        let call = ToolCall::new("c1", "list_expenses", json!("not json at all"));
        assert_eq!(call.decoded_arguments(), json!({"input": "not json at all"}));

        // Valid JSON that is not an object is treated the same way
        let call = ToolCall::new("c2", "list_expenses", json!("42"));
        assert_eq!(call.decoded_arguments(), json!({"input": "42"}));
    }
}
