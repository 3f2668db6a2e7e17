//! Pipeline result types
//!
//! Stage-2 branch failures are data, not errors: each failed branch shows
//! up as [`Auxiliary::Absent`] next to its plan item.

use serde::{Deserialize, Serialize};

/// Outcome of one branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BranchOutcome<T> {
    Success { value: T },
    Failure { reason: String },
}

impl<T> BranchOutcome<T> {
    pub fn success(value: T) -> Self {
        BranchOutcome::Success { value }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        BranchOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BranchOutcome::Success { .. })
    }
}

/// Result of one branch of one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStageResult<T> {
    pub stage_index: usize,
    pub branch_index: usize,
    pub outcome: BranchOutcome<T>,
}

impl<T> PipelineStageResult<T> {
    pub fn new(stage_index: usize, branch_index: usize, outcome: BranchOutcome<T>) -> Self {
        Self {
            stage_index,
            branch_index,
            outcome,
        }
    }
}

/// Auxiliary value attached to a plan item, or the absent marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Auxiliary<A> {
    Present(A),
    Absent,
}

impl<A> Auxiliary<A> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Auxiliary::Absent)
    }

    pub fn as_option(&self) -> Option<&A> {
        match self {
            Auxiliary::Present(value) => Some(value),
            Auxiliary::Absent => None,
        }
    }

    pub fn into_option(self) -> Option<A> {
        match self {
            Auxiliary::Present(value) => Some(value),
            Auxiliary::Absent => None,
        }
    }
}

impl<A> From<BranchOutcome<A>> for Auxiliary<A> {
    fn from(outcome: BranchOutcome<A>) -> Self {
        match outcome {
            BranchOutcome::Success { value } => Auxiliary::Present(value),
            BranchOutcome::Failure { .. } => Auxiliary::Absent,
        }
    }
}

/// One plan item with its (possibly absent) auxiliary value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeItem<I, A> {
    pub item: I,
    pub auxiliary: Auxiliary<A>,
}

/// Reassembled output of a two-stage pipeline.
///
/// `items[i]` always corresponds to plan item `i`, whatever order the
/// branches finished in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult<P, I, A> {
    pub plan: P,
    pub items: Vec<CompositeItem<I, A>>,
}

impl<P, I, A> CompositeResult<P, I, A> {
    /// Assemble from plan items and branch results in any order.
    ///
    /// Items with no matching branch result are marked absent.
    pub fn assemble(plan: P, items: Vec<I>, branches: Vec<PipelineStageResult<A>>) -> Self {
        let mut slots: Vec<Auxiliary<A>> = items.iter().map(|_| Auxiliary::Absent).collect();
        for branch in branches {
            if let Some(slot) = slots.get_mut(branch.branch_index) {
                *slot = branch.outcome.into();
            }
        }

        let items = items
            .into_iter()
            .zip(slots)
            .map(|(item, auxiliary)| CompositeItem { item, auxiliary })
            .collect();

        Self { plan, items }
    }

    /// Indices of items whose branch failed
    pub fn absent_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.auxiliary.is_absent())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn present_count(&self) -> usize {
        self.items.len() - self.absent_indices().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_reorders_by_branch_index() {
        let branches = vec![
            PipelineStageResult::new(1, 2, BranchOutcome::success("c!")),
            PipelineStageResult::new(1, 0, BranchOutcome::success("a!")),
            PipelineStageResult::new(1, 1, BranchOutcome::failure("timeout")),
        ];
        let result = CompositeResult::assemble("plan", vec!["a", "b", "c"], branches);

        assert_eq!(result.items.len(), 3);
        assert_eq!(result.items[0].item, "a");
        assert_eq!(result.items[0].auxiliary, Auxiliary::Present("a!"));
        assert!(result.items[1].auxiliary.is_absent());
        assert_eq!(result.items[2].auxiliary.as_option(), Some(&"c!"));
        assert_eq!(result.absent_indices(), vec![1]);
        assert_eq!(result.present_count(), 2);
    }

    #[test]
    fn test_missing_branch_is_absent() {
        let result: CompositeResult<(), &str, u8> =
            CompositeResult::assemble((), vec!["a", "b"], vec![]);
        assert_eq!(result.absent_indices(), vec![0, 1]);
    }

    #[test]
    fn test_out_of_range_branch_ignored() {
        let branches = vec![PipelineStageResult::new(1, 7, BranchOutcome::success(1u8))];
        let result = CompositeResult::assemble((), vec!["only"], branches);
        assert_eq!(result.items.len(), 1);
        assert!(result.items[0].auxiliary.is_absent());
    }

    #[test]
    fn test_auxiliary_serde() {
        let present = serde_json::to_value(Auxiliary::Present(3)).unwrap();
        assert_eq!(present, serde_json::json!({"state": "present", "value": 3}));
        let absent = serde_json::to_value(Auxiliary::<u8>::Absent).unwrap();
        assert_eq!(absent, serde_json::json!({"state": "absent"}));
    }
}
