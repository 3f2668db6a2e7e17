//! Orchestration errors
//!
//! Every failure of a generation request, a resolution loop or a stream is
//! one of these variants. Pipeline stage-2 failures never appear here; they
//! become absent markers in the composite result.

use crate::ports::generation_client::ProviderError;
use genflow_domain::SchemaError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestrationError {
    #[error("Schema validation failed: {0}")]
    SchemaValidation(#[from] SchemaError),

    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },

    #[error("Invalid input for tool '{tool}': {source}")]
    ToolInputInvalid {
        tool: String,
        #[source]
        source: SchemaError,
    },

    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    #[error("No final answer within {max_rounds} tool rounds")]
    ResolutionLimitExceeded { max_rounds: usize },

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Provider timed out")]
    ProviderTimeout,

    #[error("Provider rejected request: {0}")]
    ProviderRejected(String),

    #[error("Stream failed: {0}")]
    Stream(String),
}

impl OrchestrationError {
    /// Whether the caller may retry the whole request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrchestrationError::ProviderUnavailable(_) | OrchestrationError::ProviderTimeout
        )
    }

    pub fn tool_not_found(name: impl Into<String>) -> Self {
        OrchestrationError::ToolNotFound { name: name.into() }
    }
}

impl From<ProviderError> for OrchestrationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(msg) => OrchestrationError::ProviderUnavailable(msg),
            ProviderError::Rejected(msg) => OrchestrationError::ProviderRejected(msg),
            ProviderError::Timeout => OrchestrationError::ProviderTimeout,
        }
    }
}

/// Errors of a whole pipeline run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Stage 1 failed; there is nothing to fan out
    #[error("Planning stage failed: {0}")]
    Plan(#[from] OrchestrationError),

    #[error("Pipeline cancelled")]
    Cancelled,
}
