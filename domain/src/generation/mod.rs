//! Generation request/result types exchanged with a model provider

pub mod model;
pub mod request;
pub mod result;

pub use model::ModelId;
pub use request::GenerationRequest;
pub use result::GenerationResult;
