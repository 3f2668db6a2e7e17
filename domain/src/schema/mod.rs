//! Output shapes and the schema validator
//!
//! Every structured generation in genflow declares an [`OutputShape`]. The
//! validator guarantees that a value handed back to a caller conforms to
//! that shape, or produces a [`SchemaError`] naming the first offending path.
//!
//! ```text
//! provider value ──▶ validate(value, shape) ──▶ Ok(normalized value)
//!                                          └─▶ Err(SchemaError { path, expected, actual })
//! ```

pub mod error;
pub mod shape;
pub mod validator;

pub use error::SchemaError;
pub use shape::{FieldShape, OutputShape, StringFormat};
pub use validator::{kind_of, validate, validate_as};
