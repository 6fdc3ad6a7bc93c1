//! Simulated progress for a request that reports none.
//!
//! The analysis service answers a single POST after doing all of its work, so
//! the client fabricates a steadily rising estimate and maps it onto the
//! phases the service is presumed to run through. The mapping carries no
//! information about the real remote phase.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub const PROGRESS_INCREMENT: u8 = 5;
pub const PROGRESS_CEILING: u8 = 95;
pub const PROGRESS_COMPLETE: u8 = 100;
pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

pub const PIPELINE_STEPS: [&str; 8] = [
    "Dataset Ingestion",
    "Initial Analysis",
    "Data Quality Assessment",
    "Bias Detection",
    "Privacy Assessment",
    "Lineage Documentation",
    "Governance Compliance",
    "Recommendations",
];

pub const LAST_STEP: usize = PIPELINE_STEPS.len() - 1;

/// `floor(progress / 100 * steps)`, clamped to the last step.
pub fn step_index_for(progress: u8) -> usize {
    let index = progress as usize * PIPELINE_STEPS.len() / PROGRESS_COMPLETE as usize;
    index.min(LAST_STEP)
}

/// A progress percentage and the step derived from it. Only built through
/// [`ProgressSnapshot::at`], so the step always matches the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    progress: u8,
    step_index: usize,
}

impl ProgressSnapshot {
    pub fn at(progress: u8) -> Self {
        let progress = progress.min(PROGRESS_COMPLETE);
        Self {
            progress,
            step_index: step_index_for(progress),
        }
    }

    pub fn start() -> Self {
        Self::at(0)
    }

    pub fn complete() -> Self {
        Self::at(PROGRESS_COMPLETE)
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_name(&self) -> &'static str {
        PIPELINE_STEPS
            .get(self.step_index)
            .copied()
            .unwrap_or(PIPELINE_STEPS[LAST_STEP])
    }

    /// The next simulated value, or `None` once the ceiling is reached.
    pub fn advance(&self) -> Option<Self> {
        (self.progress < PROGRESS_CEILING)
            .then(|| Self::at((self.progress + PROGRESS_INCREMENT).min(PROGRESS_CEILING)))
    }
}

/// Background timer publishing a new snapshot every tick until stopped or the
/// ceiling is reached.
#[derive(Debug)]
pub struct ProgressSimulator {
    task: Option<JoinHandle<()>>,
}

impl ProgressSimulator {
    pub fn start<F>(tick: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(ProgressSnapshot) + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut ticker = interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick of a tokio interval completes immediately.
            ticker.tick().await;

            let mut current = ProgressSnapshot::start();
            while let Some(next) = current.advance() {
                ticker.tick().await;
                current = next;
                tracing::trace!(progress = current.progress(), step = current.step_name(), "Progress tick");
                on_tick(current);
            }
        });

        Self { task: Some(task) }
    }

    /// Aborts the timer and waits for it to wind down. After this returns the
    /// callback will not run again. Calling it twice is a no-op.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
