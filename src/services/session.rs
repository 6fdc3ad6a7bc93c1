use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::Config;
use crate::error::{ExportError, PipelineError};
use crate::models::AnalysisResult;
use crate::services::executor::{PipelineExecutor, RunState};
use crate::services::exporter::{ExportedReport, ReportExporter};
use crate::services::file_selection::{FileSelection, UploadCandidate};
use crate::services::notifier::Notifier;
use crate::services::sample_size::{SampleSize, SampleSizeControl};

/// Everything behind one pipeline screen: the staged file, the sample size,
/// the run and the export action.
pub struct PipelineSession {
    selection: FileSelection,
    sample_size: SampleSizeControl,
    executor: PipelineExecutor,
    exporter: ReportExporter,
}

impl PipelineSession {
    pub fn new(executor: PipelineExecutor, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            selection: FileSelection::new(Arc::clone(&notifier)),
            sample_size: SampleSizeControl::new(),
            executor,
            exporter: ReportExporter::new(notifier),
        }
    }

    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self, PipelineError> {
        let executor = PipelineExecutor::from_config(config, Arc::clone(&notifier))?;
        Ok(Self::new(executor, notifier))
    }

    pub fn candidate(&self) -> Option<&UploadCandidate> {
        self.selection.current()
    }

    pub fn sample_size(&self) -> SampleSize {
        self.sample_size.value()
    }

    pub fn state(&self) -> RunState {
        self.executor.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.executor.subscribe()
    }

    pub fn select_file(
        &mut self,
        name: impl Into<String>,
        contents: impl Into<Bytes>,
    ) -> Result<UploadCandidate, PipelineError> {
        self.selection.select(name, contents)
    }

    pub async fn select_path(&mut self, path: &Path) -> Result<UploadCandidate, PipelineError> {
        self.selection.select_path(path).await
    }

    pub fn clear_file(&mut self) {
        self.selection.clear();
    }

    pub fn set_sample_size_from_slider(&mut self, n: i64) -> SampleSize {
        self.sample_size.set_from_slider(n)
    }

    pub fn set_sample_size_from_text(&mut self, text: &str) -> SampleSize {
        self.sample_size.set_from_numeric_input(text)
    }

    pub async fn run(&self) -> Result<Arc<AnalysisResult>, PipelineError> {
        self.executor
            .run(self.selection.current(), self.sample_size.value())
            .await
    }

    /// Drops the candidate and the last result. The sample size is kept.
    pub fn start_new_analysis(&mut self) -> bool {
        if !self.executor.reset() {
            return false;
        }
        self.selection.clear();
        true
    }

    pub async fn export_report(&self, dir: &Path) -> Result<ExportedReport, ExportError> {
        let state = self.executor.state();
        let result = state.result().ok_or(ExportError::NoResult)?;
        self.exporter.export(result, dir).await
    }
}
