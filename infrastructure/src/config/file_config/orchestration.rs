//! Orchestration configuration from TOML (`[orchestration]` section)

use serde::{Deserialize, Serialize};

/// Raw orchestration limits and timeouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    /// Maximum tool rounds per request
    pub max_tool_rounds: usize,
    pub provider_timeout_secs: u64,
    pub tool_timeout_secs: u64,
    /// Per-branch timeout in fan-out stages
    pub branch_timeout_secs: u64,
    pub media_timeout_secs: u64,
    /// Maximum concurrent fan-out branches
    pub max_concurrency: usize,
    /// Stream channel capacity
    pub stream_buffer: usize,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 5,
            provider_timeout_secs: 60,
            tool_timeout_secs: 10,
            branch_timeout_secs: 90,
            media_timeout_secs: 120,
            max_concurrency: 4,
            stream_buffer: 32,
        }
    }
}
