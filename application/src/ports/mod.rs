//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod generation_client;
pub mod generation_logger;
pub mod media;
pub mod progress;
