//! Tool domain module
//!
//! Tools are named, side-effect-free data-fetch functions the model may ask
//! for during generation. Every tool is described by a [`ToolDefinition`]
//! (name, description, input shape, output shape, handler), requested via a
//! [`ToolCall`], and each completed round is recorded as a
//! [`TranscriptEntry`].
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ TranscriptEntry  │
//! │ (registry)     │    │ (from model) │    │ (fed back)       │
//! └──────┬─────────┘    └──────────────┘    └──────────────────┘
//!        │
//!        └─ descriptor(): name + description + input shape (no handler)
//! ```
//!
//! # Architecture
//!
//! - **Domain** (this module): definitions, validation, handler trait
//! - **Application** (`ToolRegistry`): lookup and timed execution
//! - **Infrastructure** (`campus` tools): concrete handlers

pub mod entities;
pub mod handler;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolDescriptor, TranscriptEntry};
pub use handler::{FnToolHandler, ToolHandler};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::ToolError;
