//! Progress notification port
//!
//! Defines the interface for reporting progress during pipeline execution.

/// Stages of a two-stage pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Stage 1: produce the plan
    Plan,
    /// Stage 2: one branch per plan item
    FanOut,
}

impl PipelineStage {
    pub fn as_str(&self) -> &str {
        match self {
            PipelineStage::Plan => "plan",
            PipelineStage::FanOut => "fan_out",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            PipelineStage::Plan => "Planning",
            PipelineStage::FanOut => "Generating media",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PipelineStage::Plan => 0,
            PipelineStage::FanOut => 1,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Callback for progress updates during a pipeline run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: PipelineStage, total_tasks: usize);

    /// Called when one branch of a stage completes
    fn on_branch_complete(&self, stage: PipelineStage, branch_index: usize, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: PipelineStage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: PipelineStage, _total_tasks: usize) {}
    fn on_branch_complete(&self, _stage: PipelineStage, _branch_index: usize, _success: bool) {}
    fn on_stage_complete(&self, _stage: PipelineStage) {}
}
