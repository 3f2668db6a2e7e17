//! Infrastructure layer for genflow
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use logging::JsonlGenerationLogger;
pub use providers::{GeminiClient, ScriptedProvider};
pub use tools::{CampusDirectory, campus_registry, register_campus_tools};
