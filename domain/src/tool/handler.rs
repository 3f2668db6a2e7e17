//! Tool handler abstraction
//!
//! A [`ToolHandler`] is the externally supplied function behind a tool.
//! Handlers only fetch data; they never touch orchestration state, and any
//! retry policy is theirs to own.

use super::value_objects::ToolError;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;

/// The function behind a [`ToolDefinition`](super::ToolDefinition)
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the tool with an already-validated input
    async fn call(&self, input: Value) -> Result<Value, ToolError>;
}

/// Adapter turning an async closure into a [`ToolHandler`]
pub struct FnToolHandler<F> {
    f: F,
}

impl<F> FnToolHandler<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ToolHandler for FnToolHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send,
{
    async fn call(&self, input: Value) -> Result<Value, ToolError> {
        (self.f)(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fn_handler_passes_input() {
        let handler = FnToolHandler::new(|input: Value| async move { Ok(json!({ "echo": input })) });
        let output = handler.call(json!({"q": 1})).await.unwrap();
        assert_eq!(output, json!({"echo": {"q": 1}}));
    }

    #[tokio::test]
    async fn test_fn_handler_propagates_error() {
        let handler =
            FnToolHandler::new(|_input: Value| async { Err(ToolError::execution_failed("boom")) });
        let err = handler.call(json!({})).await.unwrap_err();
        assert_eq!(err.code, "EXECUTION_FAILED");
    }
}
