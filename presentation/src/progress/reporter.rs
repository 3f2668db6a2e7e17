//! Progress reporting for pipeline execution

use colored::Colorize;
use genflow_application::{PipelineStage, ProgressNotifier};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports pipeline progress with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
    failures: Mutex<Vec<usize>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Branch indices reported as failed so far
    pub fn failures(&self) -> Vec<usize> {
        self.failures.lock().map(|f| f.clone()).unwrap_or_default()
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_label(stage: PipelineStage) -> String {
        format!("Stage {}: {}", stage.index() + 1, stage.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: PipelineStage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_label(stage));
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.stage_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_branch_complete(&self, stage: PipelineStage, branch_index: usize, success: bool) {
        if !success && stage == PipelineStage::FanOut
            && let Ok(mut failures) = self.failures.lock()
        {
            failures.push(branch_index);
        }

        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} #{}", "v".green(), branch_index + 1)
            } else {
                format!("{} #{}", "x".red(), branch_index + 1)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: PipelineStage) {
        if let Ok(mut bar) = self.stage_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("{} complete!", stage.display_name().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: PipelineStage, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::stage_label(stage).bold(),
            total_tasks
        );
    }

    fn on_branch_complete(&self, _stage: PipelineStage, branch_index: usize, success: bool) {
        if success {
            eprintln!("  {} #{}", "v".green(), branch_index + 1);
        } else {
            eprintln!("  {} #{} (failed)", "x".red(), branch_index + 1);
        }
    }

    fn on_stage_complete(&self, _stage: PipelineStage) {
        eprintln!();
    }
}
