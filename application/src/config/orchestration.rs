//! Orchestration parameters
//!
//! [`OrchestrationConfig`] groups the static parameters used by
//! [`GenerateUseCase`](crate::use_cases::generate::GenerateUseCase),
//! [`StreamUseCase`](crate::use_cases::stream::StreamUseCase) and
//! [`PipelineCoordinator`](crate::use_cases::pipeline::PipelineCoordinator).
//!
//! | Parameter | Used by |
//! |-----------|---------|
//! | `max_tool_rounds` | generate, stream |
//! | `provider_timeout` | generate, stream |
//! | `tool_timeout` | generate, stream |
//! | `branch_timeout` | pipeline |
//! | `max_concurrency` | pipeline |
//! | `stream_buffer` | stream |
//! | `media_timeout` | media |

use super::retry::RetryPolicy;
use genflow_domain::DEFAULT_MAX_TOOL_ROUNDS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    /// Maximum tool rounds per request.
    pub max_tool_rounds: usize,
    /// Timeout for each provider call (and each stream read).
    pub provider_timeout: Duration,
    /// Timeout for each tool handler call.
    pub tool_timeout: Duration,
    /// Timeout for each stage-2 pipeline branch.
    pub branch_timeout: Duration,
    /// Maximum branches running at once.
    pub max_concurrency: usize,
    /// Capacity of the stream channel (backpressure bound).
    pub stream_buffer: usize,
    /// Timeout for speech and transcription calls.
    pub media_timeout: Duration,
    /// Retry policy for `complete` calls.
    pub retry: RetryPolicy,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            provider_timeout: Duration::from_secs(60),
            tool_timeout: Duration::from_secs(10),
            branch_timeout: Duration::from_secs(90),
            max_concurrency: 4,
            stream_buffer: 32,
            media_timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
        }
    }
}

impl OrchestrationConfig {
    // ==================== Builder Methods ====================

    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_branch_timeout(mut self, timeout: Duration) -> Self {
        self.branch_timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    pub fn with_stream_buffer(mut self, size: usize) -> Self {
        self.stream_buffer = size.max(1);
        self
    }

    pub fn with_media_timeout(mut self, timeout: Duration) -> Self {
        self.media_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = OrchestrationConfig::default();
        assert_eq!(config.max_tool_rounds, 5);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.stream_buffer, 32);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_builder() {
        let config = OrchestrationConfig::default()
            .with_max_tool_rounds(2)
            .with_branch_timeout(Duration::from_millis(50))
            .with_max_concurrency(0)
            .with_stream_buffer(0)
            .with_retry(RetryPolicy::none());

        assert_eq!(config.max_tool_rounds, 2);
        assert_eq!(config.branch_timeout, Duration::from_millis(50));
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.stream_buffer, 1);
        assert_eq!(config.retry.max_attempts, 1);
    }
}
