//! Tool registry and timed tool execution

pub mod registry;

pub use registry::{PreparedCall, ToolRegistry};
