//! Tool Registry
//!
//! The [`ToolRegistry`] maps tool names to [`ToolDefinition`]s. It is filled
//! once at startup and then shared read-only (behind an `Arc`) by every
//! in-flight resolution loop.
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! registry.register(campus_events_tool());
//! registry.register(campus_locations_tool());
//! let registry = Arc::new(registry);
//!
//! // Advertise to the provider (no handlers leave the registry)
//! let tools = registry.list_for_prompt();
//!
//! // Validate, run under a timeout, validate the output
//! let output = registry.execute(&call, Duration::from_secs(10)).await?;
//! ```

use crate::error::OrchestrationError;
use futures::FutureExt;
use genflow_domain::tool::{
    DefaultToolValidator, ToolCall, ToolDefinition, ToolDescriptor, ToolValidator,
};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, warn};

/// Name-keyed tool definitions (last registration wins)
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
    validator: DefaultToolValidator,
}

/// A call whose tool exists and whose input passed validation
pub struct PreparedCall<'a> {
    definition: &'a ToolDefinition,
    input: Value,
    validator: &'a DefaultToolValidator,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any previous tool with the same name
    pub fn register(&mut self, definition: ToolDefinition) {
        let name = definition.name.clone();
        if self.tools.insert(name.clone(), definition).is_some() {
            debug!(tool = %name, "Replaced existing tool definition");
        } else {
            debug!(tool = %name, "Registered tool");
        }
    }

    /// Builder-style registration
    pub fn with_tool(mut self, definition: ToolDefinition) -> Self {
        self.register(definition);
        self
    }

    pub fn resolve(&self, name: &str) -> Result<&ToolDefinition, OrchestrationError> {
        self.tools
            .get(name)
            .ok_or_else(|| OrchestrationError::tool_not_found(name))
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Every tool as advertised to a provider, sorted by name
    pub fn list_for_prompt(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<_> = self.tools.values().map(|t| t.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Descriptors for the named tools only, in the given order
    pub fn subset(&self, names: &[&str]) -> Result<Vec<ToolDescriptor>, OrchestrationError> {
        names
            .iter()
            .map(|name| self.resolve(name).map(|t| t.descriptor()))
            .collect()
    }

    /// Resolve the tool and validate the call's input against its input shape.
    ///
    /// Fails with `ToolNotFound` or `ToolInputInvalid`; the handler has not
    /// been touched when this returns an error.
    pub fn prepare(&self, call: &ToolCall) -> Result<PreparedCall<'_>, OrchestrationError> {
        let definition = self.resolve(&call.tool_name)?;
        let input = self
            .validator
            .validate_input(call, definition)
            .map_err(|source| OrchestrationError::ToolInputInvalid {
                tool: call.tool_name.clone(),
                source,
            })?;
        Ok(PreparedCall {
            definition,
            input,
            validator: &self.validator,
        })
    }

    /// Prepare and run a call in one step
    pub async fn execute(&self, call: &ToolCall, timeout: Duration) -> Result<Value, OrchestrationError> {
        self.prepare(call)?.run(timeout).await
    }
}

impl PreparedCall<'_> {
    pub fn tool_name(&self) -> &str {
        &self.definition.name
    }

    /// Normalized input that will be passed to the handler
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Run the handler under `timeout` and validate its output.
    ///
    /// Handler errors, panics, timeouts and malformed output all become
    /// `ToolExecutionFailed`. Nothing is retried here.
    pub async fn run(self, timeout: Duration) -> Result<Value, OrchestrationError> {
        let tool = self.definition.name.clone();
        let handler = self.definition.handler();
        let call = AssertUnwindSafe(handler.call(self.input)).catch_unwind();

        let output = match tokio::time::timeout(timeout, call).await {
            Ok(Ok(Ok(output))) => output,
            Ok(Ok(Err(e))) => {
                warn!(tool = %tool, error = %e, "Tool handler failed");
                return Err(OrchestrationError::ToolExecutionFailed {
                    tool,
                    reason: e.to_string(),
                });
            }
            Ok(Err(_)) => {
                warn!(tool = %tool, "Tool handler panicked");
                return Err(OrchestrationError::ToolExecutionFailed {
                    tool,
                    reason: "handler panicked".to_string(),
                });
            }
            Err(_) => {
                warn!(tool = %tool, timeout_ms = timeout.as_millis() as u64, "Tool handler timed out");
                return Err(OrchestrationError::ToolExecutionFailed {
                    tool,
                    reason: format!("timed out after {:?}", timeout),
                });
            }
        };

        self.validator
            .validate_output(&output, self.definition)
            .map_err(|e| OrchestrationError::ToolExecutionFailed {
                tool,
                reason: format!("invalid output: {}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genflow_domain::schema::{FieldShape, OutputShape};
    use genflow_domain::tool::ToolError;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn echo_tool(name: &str, description: &str) -> ToolDefinition {
        ToolDefinition::from_fn(
            name,
            description,
            OutputShape::object([FieldShape::required("text", OutputShape::string())]),
            OutputShape::string(),
            |input: Value| async move {
                Ok(input.get("text").cloned().unwrap_or(Value::Null))
            },
        )
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = ToolRegistry::new().with_tool(echo_tool("echo", "Echo text"));
        assert!(registry.has_tool("echo"));
        assert_eq!(registry.resolve("echo").unwrap().description, "Echo text");
        assert_eq!(
            registry.resolve("missing").unwrap_err(),
            OrchestrationError::tool_not_found("missing")
        );
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("echo", "first"));
        registry.register(echo_tool("echo", "second"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("echo").unwrap().description, "second");
    }

    #[test]
    fn test_list_for_prompt_sorted() {
        let registry = ToolRegistry::new()
            .with_tool(echo_tool("zeta", "z"))
            .with_tool(echo_tool("alpha", "a"));
        let names: Vec<_> = registry.list_for_prompt().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_subset() {
        let registry = ToolRegistry::new()
            .with_tool(echo_tool("a", "a"))
            .with_tool(echo_tool("b", "b"));
        let subset = registry.subset(&["b"]).unwrap();
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].name, "b");
        assert!(registry.subset(&["b", "c"]).is_err());
    }

    #[tokio::test]
    async fn test_execute_success() {
        let registry = ToolRegistry::new().with_tool(echo_tool("echo", "Echo"));
        let call = ToolCall::new("echo").with_arg("text", "hi");
        let output = registry.execute(&call, Duration::from_secs(1)).await.unwrap();
        assert_eq!(output, json!("hi"));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = ToolRegistry::new().with_tool(ToolDefinition::from_fn(
            "count",
            "Counts calls",
            OutputShape::object([FieldShape::required("n", OutputShape::integer())]),
            OutputShape::any(),
            move |_| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(json!(null))
                }
            },
        ));

        let call = ToolCall::new("count").with_arg("n", "seven");
        let err = registry.execute(&call, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, OrchestrationError::ToolInputInvalid { ref tool, .. } if tool == "count"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_error_is_execution_failure() {
        let registry = ToolRegistry::new().with_tool(ToolDefinition::from_fn(
            "broken",
            "Always fails",
            OutputShape::empty_object(),
            OutputShape::any(),
            |_| async { Err(ToolError::execution_failed("database offline")) },
        ));
        let err = registry
            .execute(&ToolCall::new("broken"), Duration::from_secs(1))
            .await
            .unwrap_err();
        match err {
            OrchestrationError::ToolExecutionFailed { tool, reason } => {
                assert_eq!(tool, "broken");
                assert!(reason.contains("database offline"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    struct Exploding;

    #[async_trait::async_trait]
    impl genflow_domain::tool::ToolHandler for Exploding {
        async fn call(&self, _input: Value) -> Result<Value, ToolError> {
            panic!("handler exploded")
        }
    }

    #[tokio::test]
    async fn test_handler_panic_is_execution_failure() {
        let registry = Arc::new(ToolRegistry::new().with_tool(ToolDefinition::new(
            "exploding",
            "Panics",
            OutputShape::empty_object(),
            OutputShape::any(),
            Exploding,
        )));

        // Run on a separate task so a leaked panic would surface as a JoinError
        let result = tokio::spawn(async move {
            registry
                .execute(&ToolCall::new("exploding"), Duration::from_secs(1))
                .await
        })
        .await
        .expect("caller task survives a panicking handler");

        match result.unwrap_err() {
            OrchestrationError::ToolExecutionFailed { tool, reason } => {
                assert_eq!(tool, "exploding");
                assert_eq!(reason, "handler panicked");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handler_timeout() {
        let registry = ToolRegistry::new().with_tool(ToolDefinition::from_fn(
            "slow",
            "Sleeps",
            OutputShape::empty_object(),
            OutputShape::any(),
            |_| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(json!(null))
            },
        ));
        let err = registry
            .execute(&ToolCall::new("slow"), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::ToolExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn test_invalid_output_is_execution_failure() {
        let registry = ToolRegistry::new().with_tool(ToolDefinition::from_fn(
            "liar",
            "Returns the wrong shape",
            OutputShape::empty_object(),
            OutputShape::array(OutputShape::string()),
            |_| async { Ok(json!({"not": "an array"})) },
        ));
        let err = registry
            .execute(&ToolCall::new("liar"), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::ToolExecutionFailed { ref reason, .. } if reason.contains("invalid output")));
    }

    #[test]
    fn test_prepare_normalizes_input() {
        let registry = ToolRegistry::new().with_tool(echo_tool("echo", "Echo"));
        let call = ToolCall::new("echo").with_arg("text", "x").with_arg("extra", 1);
        let prepared = registry.prepare(&call).unwrap();
        assert_eq!(prepared.tool_name(), "echo");
        assert_eq!(prepared.input(), &json!({"text": "x"}));
    }
}
