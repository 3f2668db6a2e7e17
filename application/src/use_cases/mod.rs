//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod generate;
pub mod media;
pub mod pipeline;
pub mod presentation;
pub(crate) mod shared;
pub mod stream;
