//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! Execution (with timeouts) lives in the application layer's registry.

use super::entities::{ToolCall, ToolDefinition};
use crate::schema::{SchemaError, validate};
use serde_json::Value;

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a call's input against the tool's input shape.
    ///
    /// Returns the normalized input on success.
    fn validate_input(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<Value, SchemaError>;

    /// Validate a handler's output against the tool's output shape.
    fn validate_output(&self, output: &Value, definition: &ToolDefinition) -> Result<Value, SchemaError>;
}

/// Default implementation of ToolValidator backed by the schema validator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate_input(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<Value, SchemaError> {
        // Providers sometimes send `null` for zero-argument tools
        if call.input.is_null() {
            return validate(&Value::Object(Default::default()), &definition.input_shape);
        }
        validate(&call.input, &definition.input_shape)
    }

    fn validate_output(&self, output: &Value, definition: &ToolDefinition) -> Result<Value, SchemaError> {
        validate(output, &definition.output_shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldShape, OutputShape};
    use serde_json::json;

    fn definition() -> ToolDefinition {
        ToolDefinition::from_fn(
            "find",
            "find things",
            OutputShape::object([
                FieldShape::required("name", OutputShape::string()),
                FieldShape::optional("limit", OutputShape::integer().bounded(1.0, 10.0)),
            ]),
            OutputShape::array(OutputShape::string()),
            |_| async { Ok(json!([])) },
        )
    }

    #[test]
    fn test_validator_missing_required() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("find");
        let err = validator.validate_input(&call, &definition()).unwrap_err();
        assert_eq!(err.path, "$.name");
        assert_eq!(err.actual, "missing");
    }

    #[test]
    fn test_validator_out_of_range() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("find").with_arg("name", "x").with_arg("limit", 50);
        assert!(validator.validate_input(&call, &definition()).is_err());
    }

    #[test]
    fn test_validator_valid_call() {
        let validator = DefaultToolValidator;
        let call = ToolCall::new("find").with_arg("name", "x").with_arg("extra", true);
        let input = validator.validate_input(&call, &definition()).unwrap();
        assert_eq!(input, json!({"name": "x"}));
    }

    #[test]
    fn test_null_input_treated_as_empty_object() {
        let validator = DefaultToolValidator;
        let zero_arg = ToolDefinition::from_fn(
            "list",
            "list",
            OutputShape::empty_object(),
            OutputShape::any(),
            |_| async { Ok(json!([])) },
        );
        let call = ToolCall::new("list").with_input(Value::Null);
        assert_eq!(validator.validate_input(&call, &zero_arg).unwrap(), json!({}));
    }

    #[test]
    fn test_validator_output() {
        let validator = DefaultToolValidator;
        assert!(validator.validate_output(&json!(["a"]), &definition()).is_ok());
        assert!(validator.validate_output(&json!([1]), &definition()).is_err());
    }
}
