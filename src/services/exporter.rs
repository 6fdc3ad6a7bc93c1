use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ExportError;
use crate::models::AnalysisResult;
use crate::services::notifier::{Notification, Notifier};

const FILENAME_PREFIX: &str = "data_governance_report_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub file_name: String,
    pub path: PathBuf,
}

/// `data_governance_report_<ISO-8601 with ':' and '.' as '-'>.json`
pub fn report_filename(at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}{}.json", FILENAME_PREFIX, stamp)
}

/// Pretty-printed `full_report`, exactly as the service returned it.
pub fn render(result: &AnalysisResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&result.full_report)?)
}

pub struct ReportExporter {
    notifier: Arc<dyn Notifier>,
}

impl ReportExporter {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub async fn export(&self, result: &AnalysisResult, dir: &Path) -> Result<ExportedReport, ExportError> {
        self.export_at(result, dir, Utc::now()).await
    }

    pub async fn export_at(
        &self,
        result: &AnalysisResult,
        dir: &Path,
        at: DateTime<Utc>,
    ) -> Result<ExportedReport, ExportError> {
        let contents = render(result)?;
        let file_name = report_filename(at);
        let path = dir.join(&file_name);

        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, contents).await?;

        tracing::info!(path = %path.display(), "Report exported");
        self.notifier.notify(Notification::info(
            "Report downloaded",
            "Full analysis report saved as JSON",
        ));

        Ok(ExportedReport { file_name, path })
    }
}
