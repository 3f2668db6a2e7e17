//! Domain layer for genflow
//!
//! This crate contains the core types of flow orchestration. It performs no
//! I/O and has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Schema-validated generation
//!
//! Every structured request declares an [`OutputShape`]. Provider output is
//! only ever handed to callers after [`validate`] accepts it.
//!
//! ## Tool resolution
//!
//! The model may request [`ToolCall`]s against registered
//! [`ToolDefinition`]s. A [`ResolutionState`] bounds how many rounds a single
//! request may take.
//!
//! ## Pipelines
//!
//! A plan stage followed by a fan-out stage; failed branches are recorded
//! as [`Auxiliary::Absent`] inside a [`CompositeResult`].

pub mod flows;
pub mod generation;
pub mod media;
pub mod pipeline;
pub mod resolution;
pub mod schema;
pub mod stream;
pub mod tool;

// Re-export commonly used types
pub use flows::Flow;
pub use generation::{GenerationRequest, GenerationResult, ModelId};
pub use media::{AudioClip, DataUriError, ImageAsset, SpeechAudio, Transcript};
pub use pipeline::{
    Auxiliary, BranchOutcome, CompositeItem, CompositeResult, PipelineStageResult,
};
pub use resolution::{DEFAULT_MAX_TOOL_ROUNDS, ResolutionPhase, ResolutionState, RoundLimitReached};
pub use schema::{FieldShape, OutputShape, SchemaError, StringFormat, validate, validate_as};
pub use stream::{ChunkSequencer, StreamChunk, StreamEvent};
pub use tool::{
    DefaultToolValidator, FnToolHandler, ToolCall, ToolDefinition, ToolDescriptor, ToolError,
    ToolHandler, ToolValidator, TranscriptEntry,
};
