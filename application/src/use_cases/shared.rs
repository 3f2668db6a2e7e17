//! Shared utilities for use cases.
//!
//! Contains the timed provider call and the single tool round used by both
//! the atomic resolution loop and the streaming channel.

use crate::config::RetryPolicy;
use crate::error::OrchestrationError;
use crate::ports::generation_client::{GenerationClient, ProviderError};
use crate::ports::generation_logger::{GenerationEvent, GenerationLogger};
use crate::tools::ToolRegistry;
use genflow_domain::{GenerationRequest, GenerationResult, ResolutionState, ToolCall};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Call `complete` under `timeout`, retrying transient failures per `retry`.
pub(crate) async fn complete_with_retry(
    client: &dyn GenerationClient,
    request: &GenerationRequest,
    timeout: Duration,
    retry: &RetryPolicy,
) -> Result<GenerationResult, ProviderError> {
    let mut attempt = 1;
    loop {
        let result = match tokio::time::timeout(timeout, client.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        };

        match result {
            Err(e) if e.is_retryable() && attempt < retry.max_attempts => {
                let delay = retry.backoff_for(attempt);
                warn!(
                    attempt,
                    max_attempts = retry.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Provider call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// Execute one tool round and record it in `state`.
///
/// Checks, in order: the tool is offered by the request, it is registered,
/// its input is valid, and another round is allowed. Only then does the
/// handler run. Returns the request for the next provider call.
pub(crate) async fn run_tool_round(
    registry: &ToolRegistry,
    state: &mut ResolutionState,
    request: &GenerationRequest,
    call: &ToolCall,
    tool_timeout: Duration,
    logger: &dyn GenerationLogger,
) -> Result<GenerationRequest, OrchestrationError> {
    if !request.offers_tool(&call.tool_name) {
        state.fail();
        return Err(OrchestrationError::tool_not_found(&call.tool_name));
    }

    let prepared = registry.prepare(call).inspect_err(|_| state.fail())?;

    state
        .begin_tool()
        .map_err(|limit| OrchestrationError::ResolutionLimitExceeded {
            max_rounds: limit.max_rounds,
        })?;

    debug!(
        tool = %call.tool_name,
        round = state.round_count() + 1,
        "Executing tool"
    );

    let output: Value = prepared.run(tool_timeout).await.inspect_err(|_| state.fail())?;

    logger.log(GenerationEvent::new(
        "tool_round",
        json!({
            "round": state.round_count() + 1,
            "tool": call.tool_name,
            "input": call.input,
            "output": output,
        }),
    ));

    let next = request.augmented(call, output.clone());
    state.record_round(call, output);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyClient {
        responses: Mutex<VecDeque<Result<GenerationResult, ProviderError>>>,
        calls: AtomicUsize,
    }

    impl FlakyClient {
        fn new(responses: Vec<Result<GenerationResult, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerationClient for FlakyClient {
        async fn complete(&self, _request: &GenerationRequest) -> Result<GenerationResult, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ProviderError::Unavailable("exhausted".into())))
        }
    }

    fn fast_retry(attempts: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(attempts)
            .with_initial_backoff(Duration::from_millis(1))
            .with_max_backoff(Duration::from_millis(2))
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failure() {
        let client = FlakyClient::new(vec![
            Err(ProviderError::Unavailable("503".into())),
            Ok(GenerationResult::text("ok")),
        ]);
        let result = complete_with_retry(
            &client,
            &GenerationRequest::new("x"),
            Duration::from_secs(1),
            &fast_retry(3),
        )
        .await
        .unwrap();
        assert_eq!(result, GenerationResult::text("ok"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejected_is_not_retried() {
        let client = FlakyClient::new(vec![
            Err(ProviderError::Rejected("bad prompt".into())),
            Ok(GenerationResult::text("never")),
        ]);
        let err = complete_with_retry(
            &client,
            &GenerationRequest::new("x"),
            Duration::from_secs(1),
            &fast_retry(3),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ProviderError::Rejected("bad prompt".into()));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let client = FlakyClient::new(vec![]);
        let err = complete_with_retry(
            &client,
            &GenerationRequest::new("x"),
            Duration::from_secs(1),
            &fast_retry(3),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    struct HangingClient;

    #[async_trait]
    impl GenerationClient for HangingClient {
        async fn complete(&self, _request: &GenerationRequest) -> Result<GenerationResult, ProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(GenerationResult::text("late"))
        }
    }

    #[tokio::test]
    async fn test_timeout_becomes_provider_timeout() {
        let err = complete_with_retry(
            &HangingClient,
            &GenerationRequest::new("x"),
            Duration::from_millis(20),
            &RetryPolicy::none(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ProviderError::Timeout);
    }
}
