//! Generation client port
//!
//! Defines the interface for communicating with a model provider.

use async_trait::async_trait;
use futures::stream::{self, Stream};
use genflow_domain::{GenerationRequest, GenerationResult, ToolCall};
use serde_json::Value;
use std::pin::Pin;
use thiserror::Error;

/// Failures surfaced by a provider adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Transient failure (network, 5xx, rate limit)
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The provider refused the request (malformed prompt, blocked content)
    #[error("Provider rejected request: {0}")]
    Rejected(String),

    #[error("Provider timed out")]
    Timeout,
}

impl ProviderError {
    /// Whether a bounded retry may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Unavailable(_) | ProviderError::Timeout)
    }
}

/// One item of a provider's incremental response
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderStreamItem {
    /// A text fragment, in emission order
    Text(String),
    /// The model asks for a tool; the stream ends after this
    ToolCall(ToolCall),
    /// The provider finished normally
    Done,
}

/// Lazily produced provider response; dropping it closes the connection
pub type ProviderStream =
    Pin<Box<dyn Stream<Item = Result<ProviderStreamItem, ProviderError>> + Send>>;

/// Gateway to a generation provider
///
/// Implementations (adapters) live in the infrastructure layer. They map a
/// [`GenerationRequest`] to the provider's calling convention and decide
/// whether a response is a final payload or a tool invocation.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Run a request to completion
    async fn complete(&self, request: &GenerationRequest) -> Result<GenerationResult, ProviderError>;

    /// Run a request incrementally.
    ///
    /// Default implementation calls `complete()` and replays the result as a
    /// single-chunk stream, so non-streaming adapters work unchanged.
    async fn stream(&self, request: &GenerationRequest) -> Result<ProviderStream, ProviderError> {
        let items = match self.complete(request).await? {
            GenerationResult::Final { value } => {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                vec![Ok(ProviderStreamItem::Text(text)), Ok(ProviderStreamItem::Done)]
            }
            GenerationResult::ToolCall { call } => vec![Ok(ProviderStreamItem::ToolCall(call))],
            GenerationResult::Error { reason } => vec![Err(ProviderError::Rejected(reason))],
        };
        Ok(Box::pin(stream::iter(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    struct FixedClient(GenerationResult);

    #[async_trait]
    impl GenerationClient for FixedClient {
        async fn complete(&self, _request: &GenerationRequest) -> Result<GenerationResult, ProviderError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ProviderError::Unavailable("503".into()).is_retryable());
        assert!(ProviderError::Timeout.is_retryable());
        assert!(!ProviderError::Rejected("bad".into()).is_retryable());
    }

    #[tokio::test]
    async fn test_default_stream_replays_final_text() {
        let client = FixedClient(GenerationResult::text("Hello"));
        let items: Vec<_> = client
            .stream(&GenerationRequest::new("hi"))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(
            items,
            vec![
                Ok(ProviderStreamItem::Text("Hello".into())),
                Ok(ProviderStreamItem::Done)
            ]
        );
    }

    #[tokio::test]
    async fn test_default_stream_maps_error_result() {
        let client = FixedClient(GenerationResult::error("SAFETY"));
        let items: Vec<_> = client
            .stream(&GenerationRequest::new("hi"))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(items, vec![Err(ProviderError::Rejected("SAFETY".into()))]);
    }
}
