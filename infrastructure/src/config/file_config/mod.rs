//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! after validation.

mod logging;
mod orchestration;
mod provider;
mod retry;

pub use logging::FileLoggingConfig;
pub use orchestration::FileOrchestrationConfig;
pub use provider::{FALLBACK_API_KEY_ENV, FileProviderConfig};
pub use retry::FileRetryConfig;

use genflow_application::{OrchestrationConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    Zero { field: &'static str },

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error(
        "retry.initial_backoff_ms ({initial}) must not exceed retry.max_backoff_ms ({max})"
    )]
    InvalidBackoff { initial: u64, max: u64 },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model provider settings
    pub provider: FileProviderConfig,
    /// Loop bounds, timeouts and fan-out width
    pub orchestration: FileOrchestrationConfig,
    /// Provider retry policy
    pub retry: FileRetryConfig,
    /// Structured generation log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let o = &self.orchestration;
        let non_zero = [
            ("orchestration.max_tool_rounds", o.max_tool_rounds as u64),
            ("orchestration.provider_timeout_secs", o.provider_timeout_secs),
            ("orchestration.tool_timeout_secs", o.tool_timeout_secs),
            ("orchestration.branch_timeout_secs", o.branch_timeout_secs),
            ("orchestration.media_timeout_secs", o.media_timeout_secs),
            ("orchestration.max_concurrency", o.max_concurrency as u64),
            ("orchestration.stream_buffer", o.stream_buffer as u64),
            ("retry.max_attempts", u64::from(self.retry.max_attempts)),
        ];
        if let Some((field, _)) = non_zero.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigValidationError::Zero { field });
        }

        let p = &self.provider;
        let non_empty = [
            ("provider.base_url", &p.base_url),
            ("provider.text_model", &p.text_model),
            ("provider.image_model", &p.image_model),
            ("provider.tts_model", &p.tts_model),
        ];
        if let Some((field, _)) = non_empty.into_iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigValidationError::Empty { field });
        }

        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(ConfigValidationError::InvalidBackoff {
                initial: self.retry.initial_backoff_ms,
                max: self.retry.max_backoff_ms,
            });
        }

        Ok(())
    }

    /// Convert to the application's orchestration parameters
    pub fn to_orchestration_config(&self) -> OrchestrationConfig {
        let o = &self.orchestration;
        let retry = RetryPolicy::default()
            .with_max_attempts(self.retry.max_attempts)
            .with_initial_backoff(Duration::from_millis(self.retry.initial_backoff_ms))
            .with_max_backoff(Duration::from_millis(self.retry.max_backoff_ms));

        OrchestrationConfig::default()
            .with_max_tool_rounds(o.max_tool_rounds)
            .with_provider_timeout(Duration::from_secs(o.provider_timeout_secs))
            .with_tool_timeout(Duration::from_secs(o.tool_timeout_secs))
            .with_branch_timeout(Duration::from_secs(o.branch_timeout_secs))
            .with_media_timeout(Duration::from_secs(o.media_timeout_secs))
            .with_max_concurrency(o.max_concurrency)
            .with_stream_buffer(o.stream_buffer)
            .with_retry(retry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
api_key_env = "CAMPUS_GEMINI_KEY"
text_model = "googleai/gemini-2.5-flash"
voice = "Kore"

[orchestration]
max_tool_rounds = 3
branch_timeout_secs = 30
max_concurrency = 2

[retry]
max_attempts = 1

[logging]
generation_log = "logs/generation.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.api_key_env, "CAMPUS_GEMINI_KEY");
        assert_eq!(config.provider.voice, "Kore");
        assert_eq!(config.orchestration.max_tool_rounds, 3);
        assert_eq!(config.orchestration.tool_timeout_secs, 10);
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(
            config.logging.generation_log.as_deref(),
            Some(std::path::Path::new("logs/generation.jsonl"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.logging.generation_log.is_none());
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = FileConfig::default();
        config.orchestration.max_tool_rounds = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::Zero {
                field: "orchestration.max_tool_rounds"
            })
        );

        let mut config = FileConfig::default();
        config.orchestration.provider_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigValidationError::Zero { .. })));
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = FileConfig::default();
        config.provider.image_model = "  ".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::Empty {
                field: "provider.image_model"
            })
        );
    }

    #[test]
    fn test_backoff_order_checked() {
        let mut config = FileConfig::default();
        config.retry.initial_backoff_ms = 10_000;
        config.retry.max_backoff_ms = 100;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidBackoff { initial: 10_000, max: 100 })
        ));
    }

    #[test]
    fn test_to_orchestration_config() {
        let mut config = FileConfig::default();
        config.orchestration.max_tool_rounds = 2;
        config.orchestration.branch_timeout_secs = 15;
        config.retry.max_attempts = 4;
        config.retry.initial_backoff_ms = 100;

        let orchestration = config.to_orchestration_config();
        assert_eq!(orchestration.max_tool_rounds, 2);
        assert_eq!(orchestration.branch_timeout, Duration::from_secs(15));
        assert_eq!(orchestration.tool_timeout, Duration::from_secs(10));
        assert_eq!(orchestration.retry.max_attempts, 4);
        assert_eq!(orchestration.retry.initial_backoff, Duration::from_millis(100));
    }
}
