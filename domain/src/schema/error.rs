//! Schema validation error

use thiserror::Error;

/// A value did not conform to its declared [`OutputShape`](super::OutputShape)
///
/// Identifies the first offending location as a JSON path
/// (`$.slides[2].title`) along with the expected shape and what was found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("at {path}: expected {expected}, found {actual}")]
pub struct SchemaError {
    pub path: String,
    pub expected: String,
    pub actual: String,
}
