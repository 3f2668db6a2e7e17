//! Application configuration
//!
//! Runtime parameters for the use cases. Loaded from file configuration by
//! the infrastructure layer and handed in by the binary.

pub mod orchestration;
pub mod retry;

pub use orchestration::OrchestrationConfig;
pub use retry::RetryPolicy;
