//! Configuration file loading for genflow
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `GENFLOW_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./genflow.toml` or `./.genflow.toml`
//! 4. Global: `$XDG_CONFIG_HOME/genflow/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FALLBACK_API_KEY_ENV, FileConfig, FileLoggingConfig,
    FileOrchestrationConfig, FileProviderConfig, FileRetryConfig,
};
pub use loader::ConfigLoader;
