//! Streaming value types

pub mod event;

pub use event::{ChunkSequencer, StreamChunk, StreamEvent};
