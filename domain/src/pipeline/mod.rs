//! Multi-stage pipeline results

pub mod result;

pub use result::{
    Auxiliary, BranchOutcome, CompositeItem, CompositeResult, PipelineStageResult,
};
