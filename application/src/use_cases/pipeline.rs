//! Pipeline coordinator
//!
//! Runs a plan stage followed by a fan-out stage:
//!
//! 1. **Plan**: one generation producing an ordered list of items. Any
//!    failure here is fatal.
//! 2. **Fan-out**: one branch per item, run concurrently on a [`JoinSet`]
//!    and bounded by `max_concurrency`. A failed, timed-out or panicking
//!    branch only marks its own item absent.
//!
//! Results are reassembled by item index, never by completion order.
//! Failed branches are not retried; [`CompositeResult::absent_indices`]
//! tells a wrapping caller which items to re-run.

use crate::config::OrchestrationConfig;
use crate::error::{OrchestrationError, PipelineError};
use crate::ports::progress::{PipelineStage, ProgressNotifier};
use genflow_domain::{BranchOutcome, CompositeResult, PipelineStageResult};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Executes two-stage pipelines with branch isolation
#[derive(Debug, Clone, Default)]
pub struct PipelineCoordinator {
    config: OrchestrationConfig,
}

impl PipelineCoordinator {
    pub fn new(config: OrchestrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrchestrationConfig {
        &self.config
    }

    /// Run the plan stage, then fan out over the items it yields.
    ///
    /// `items_of` extracts the ordered items from the plan. `branch` is
    /// called once per item with its index.
    pub async fn run<P, I, A, PlanFut, ItemsOf, Branch, BranchFut>(
        &self,
        plan: PlanFut,
        items_of: ItemsOf,
        branch: Branch,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<CompositeResult<P, I, A>, PipelineError>
    where
        PlanFut: Future<Output = Result<P, OrchestrationError>>,
        ItemsOf: FnOnce(&P) -> Vec<I>,
        I: Clone + Send + 'static,
        A: Send + 'static,
        Branch: Fn(usize, I) -> BranchFut,
        BranchFut: Future<Output = Result<A, String>> + Send + 'static,
    {
        progress.on_stage_start(PipelineStage::Plan, 1);
        let plan = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            plan = plan => plan,
        };
        let plan = match plan {
            Ok(plan) => {
                progress.on_branch_complete(PipelineStage::Plan, 0, true);
                progress.on_stage_complete(PipelineStage::Plan);
                plan
            }
            Err(e) => {
                warn!(error = %e, "Planning stage failed");
                progress.on_branch_complete(PipelineStage::Plan, 0, false);
                progress.on_stage_complete(PipelineStage::Plan);
                return Err(PipelineError::Plan(e));
            }
        };

        let items = items_of(&plan);
        info!(items = items.len(), "Plan ready, fanning out");

        let branches = self.fan_out(&items, branch, progress, cancel).await?;
        let result = CompositeResult::assemble(plan, items, branches);

        info!(
            present = result.present_count(),
            absent = result.absent_indices().len(),
            "Pipeline complete"
        );
        Ok(result)
    }

    /// Run one branch per item and collect the outcomes.
    ///
    /// Returns one [`PipelineStageResult`] per item, sorted by
    /// `branch_index`. Only cancellation fails the call as a whole.
    pub async fn fan_out<I, A, Branch, BranchFut>(
        &self,
        items: &[I],
        branch: Branch,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<Vec<PipelineStageResult<A>>, PipelineError>
    where
        I: Clone + Send + 'static,
        A: Send + 'static,
        Branch: Fn(usize, I) -> BranchFut,
        BranchFut: Future<Output = Result<A, String>> + Send + 'static,
    {
        let stage = PipelineStage::FanOut;
        progress.on_stage_start(stage, items.len());

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let timeout = self.config.branch_timeout;
        let mut join_set = JoinSet::new();
        let mut task_index = HashMap::new();

        for (index, item) in items.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let work = branch(index, item);

            let handle = join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| "branch scheduler closed".to_string())?;
                match tokio::time::timeout(timeout, work).await {
                    Ok(result) => result,
                    Err(_) => Err(format!("timed out after {:?}", timeout)),
                }
            });
            task_index.insert(handle.id(), index);
        }

        let mut results = Vec::with_capacity(items.len());
        loop {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(pending = join_set.len(), "Pipeline cancelled, aborting branches");
                    join_set.abort_all();
                    return Err(PipelineError::Cancelled);
                }
                joined = join_set.join_next_with_id() => joined,
            };

            let Some(joined) = joined else { break };
            let (index, outcome) = match joined {
                Ok((id, Ok(value))) => (task_index.get(&id).copied(), BranchOutcome::success(value)),
                Ok((id, Err(reason))) => (task_index.get(&id).copied(), BranchOutcome::failure(reason)),
                Err(e) => {
                    let reason = if e.is_panic() {
                        "branch panicked".to_string()
                    } else {
                        e.to_string()
                    };
                    (task_index.get(&e.id()).copied(), BranchOutcome::failure(reason))
                }
            };

            let Some(index) = index else { continue };
            match &outcome {
                BranchOutcome::Success { .. } => debug!(branch = index, "Branch succeeded"),
                BranchOutcome::Failure { reason } => {
                    warn!(branch = index, reason = %reason, "Branch failed")
                }
            }
            progress.on_branch_complete(stage, index, outcome.is_success());
            results.push(PipelineStageResult::new(stage.index(), index, outcome));
        }

        progress.on_stage_complete(stage);
        results.sort_by_key(|r| r.branch_index);
        Ok(results)
    }
}
