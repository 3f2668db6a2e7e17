//! Tool domain entities

use super::handler::{FnToolHandler, ToolHandler};
use super::value_objects::ToolError;
use crate::schema::OutputShape;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Definition of a tool the model may request during generation
///
/// Registered once at startup and never mutated. The handler is an
/// externally supplied data-fetch function with no side effects on
/// orchestration state.
#[derive(Clone)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "getCampusEvents")
    pub name: String,
    /// Free text the model uses to decide relevance
    pub description: String,
    /// Shape the tool input must satisfy before the handler runs
    pub input_shape: OutputShape,
    /// Shape the handler output must satisfy
    pub output_shape: OutputShape,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_shape: OutputShape,
        output_shape: OutputShape,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_shape,
            output_shape,
            handler: Arc::new(handler),
        }
    }

    /// Build a definition from an async closure
    pub fn from_fn<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_shape: OutputShape,
        output_shape: OutputShape,
        f: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        Self::new(name, description, input_shape, output_shape, FnToolHandler::new(f))
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    /// Handler-free projection advertised to the provider
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            input_shape: self.input_shape.clone(),
        }
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_shape", &self.input_shape)
            .field("output_shape", &self.output_shape)
            .finish_non_exhaustive()
    }
}

/// What the provider is told about a tool: never the handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_shape: OutputShape,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Input passed to the tool (usually a JSON object)
    pub input: Value,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            input: Value::Object(Default::default()),
        }
    }

    pub fn with_input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    /// Set one input argument (turns a non-object input into an object)
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if !self.input.is_object() {
            self.input = Value::Object(Default::default());
        }
        if let Value::Object(map) = &mut self.input {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(|v| v.as_str())
    }
}

/// One completed tool round: what was asked and what came back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub tool_name: String,
    pub input: Value,
    pub output: Value,
}

impl TranscriptEntry {
    pub fn new(call: &ToolCall, output: Value) -> Self {
        Self {
            tool_name: call.tool_name.clone(),
            input: call.input.clone(),
            output,
        }
    }
}
