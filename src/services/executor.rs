use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::clients::AnalysisClient;
use crate::config::Config;
use crate::error::PipelineError;
use crate::models::AnalysisResult;
use crate::services::file_selection::{UploadCandidate, UPLOAD_HINT};
use crate::services::notifier::{Notification, Notifier};
use crate::services::progress::{ProgressSimulator, ProgressSnapshot};
use crate::services::sample_size::SampleSize;

pub const NO_FILE_SELECTED: &str = "No file selected";
pub const ALREADY_RUNNING: &str = "A pipeline run is already in progress";
pub const RUN_CANCELLED: &str = "Pipeline run was cancelled";

/// Lifecycle of the single run owned by a pipeline screen.
#[derive(Debug, Clone, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running(ProgressSnapshot),
    Succeeded(Arc<AnalysisResult>),
    Failed(PipelineError),
}

impl RunState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RunState::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded(_) | RunState::Failed(_))
    }

    /// Progress for display. A succeeded run reads as complete; idle and
    /// failed runs have none.
    pub fn progress(&self) -> Option<ProgressSnapshot> {
        match self {
            RunState::Running(snapshot) => Some(*snapshot),
            RunState::Succeeded(_) => Some(ProgressSnapshot::complete()),
            RunState::Idle | RunState::Failed(_) => None,
        }
    }

    pub fn result(&self) -> Option<&Arc<AnalysisResult>> {
        match self {
            RunState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            RunState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Marks the run failed if the `run` future is dropped before it finishes.
struct RunGuard<'a> {
    state: &'a watch::Sender<RunState>,
    armed: bool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_if_modified(|state| {
                if state.is_running() {
                    tracing::warn!("Pipeline run dropped before completion");
                    *state = RunState::Failed(PipelineError::transport(RUN_CANCELLED));
                    true
                } else {
                    false
                }
            });
        }
    }
}

/// Drives one submission at a time: validates inputs, runs the progress
/// simulator alongside the upload, and publishes the terminal state.
///
/// State is published through a `watch` channel; only the executor writes it.
pub struct PipelineExecutor {
    client: AnalysisClient,
    notifier: Arc<dyn Notifier>,
    state: Arc<watch::Sender<RunState>>,
    tick: Duration,
}

impl PipelineExecutor {
    pub fn new(client: AnalysisClient, notifier: Arc<dyn Notifier>, tick: Duration) -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self {
            client,
            notifier,
            state: Arc::new(state),
            tick,
        }
    }

    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self, PipelineError> {
        Ok(Self::new(AnalysisClient::new(config)?, notifier, config.progress_tick))
    }

    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> RunState {
        self.state.borrow().clone()
    }

    /// Runs the pipeline for `candidate`.
    ///
    /// Fails fast with a validation error, leaving state untouched and issuing
    /// no request, when there is no candidate or a run is already in flight.
    /// Otherwise the returned value matches the published terminal state.
    pub async fn run(
        &self,
        candidate: Option<&UploadCandidate>,
        sample_size: SampleSize,
    ) -> Result<Arc<AnalysisResult>, PipelineError> {
        let Some(candidate) = candidate else {
            tracing::warn!("Pipeline started without a file");
            self.notifier
                .notify(Notification::destructive(NO_FILE_SELECTED, UPLOAD_HINT));
            return Err(PipelineError::validation(NO_FILE_SELECTED));
        };

        let started = self.state.send_if_modified(|state| {
            if state.is_running() {
                false
            } else {
                *state = RunState::Running(ProgressSnapshot::start());
                true
            }
        });
        if !started {
            tracing::warn!(file = %candidate.name(), "Ignoring run request while another run is in flight");
            return Err(PipelineError::validation(ALREADY_RUNNING));
        }

        let mut guard = RunGuard {
            state: self.state.as_ref(),
            armed: true,
        };

        tracing::info!(
            file = %candidate.name(),
            size_bytes = candidate.size_bytes(),
            sample_size = sample_size.get(),
            url = %self.client.upload_url(),
            "Starting pipeline run"
        );
        let start = Instant::now();

        let sink = Arc::clone(&self.state);
        let mut simulator = ProgressSimulator::start(self.tick, move |snapshot| {
            sink.send_if_modified(|state| match state {
                RunState::Running(current) if snapshot.progress() > current.progress() => {
                    *current = snapshot;
                    true
                }
                _ => false,
            });
        });

        let outcome = self.client.upload(candidate, sample_size).await;

        simulator.stop().await;
        guard.armed = false;

        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                self.state.send_replace(RunState::Succeeded(Arc::clone(&result)));
                tracing::info!(
                    rows = result.dataset_stats.rows,
                    columns = result.dataset_stats.columns,
                    elapsed = ?start.elapsed(),
                    "Pipeline completed"
                );
                self.notifier.notify(Notification::info(
                    "Pipeline completed",
                    "Data governance analysis finished successfully",
                ));
                Ok(result)
            }
            Err(error) => {
                self.state.send_replace(RunState::Failed(error.clone()));
                tracing::error!(error = %error, elapsed = ?start.elapsed(), "Pipeline failed");
                self.notifier
                    .notify(Notification::destructive("Pipeline failed", error.message()));
                Err(error)
            }
        }
    }

    /// Returns to `Idle`. Refused while a run is in flight.
    pub fn reset(&self) -> bool {
        let mut refused = false;
        self.state.send_if_modified(|state| match state {
            RunState::Running(_) => {
                refused = true;
                false
            }
            RunState::Idle => false,
            _ => {
                *state = RunState::Idle;
                true
            }
        });
        !refused
    }
}
