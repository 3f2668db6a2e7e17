//! Generation result returned by a provider

use crate::tool::ToolCall;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a provider produced for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationResult {
    /// Final payload; structured JSON or a JSON string for free text
    Final { value: Value },
    /// The model asks for a tool to be executed
    ToolCall { call: ToolCall },
    /// The provider answered but refused or failed to produce output
    Error { reason: String },
}

impl GenerationResult {
    pub fn final_value(value: Value) -> Self {
        GenerationResult::Final { value }
    }

    pub fn text(text: impl Into<String>) -> Self {
        GenerationResult::Final {
            value: Value::String(text.into()),
        }
    }

    pub fn tool_call(call: ToolCall) -> Self {
        GenerationResult::ToolCall { call }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        GenerationResult::Error {
            reason: reason.into(),
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, GenerationResult::Final { .. })
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationResult::Final { .. } => "final",
            GenerationResult::ToolCall { .. } => "tool_call",
            GenerationResult::Error { .. } => "error",
        }
    }
}
