use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::config::Config;
use crate::error::{PipelineError, GENERIC_FAILURE};
use crate::models::{AnalysisResult, ServiceErrorBody};
use crate::services::file_selection::UploadCandidate;
use crate::services::sample_size::SampleSize;

const USER_AGENT: &str = concat!("data-guardian/", env!("CARGO_PKG_VERSION"));

/// Client for the remote analysis service's upload endpoint.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http_client: Client,
    upload_url: String,
}

impl AnalysisClient {
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http_client,
            upload_url: config.upload_url(),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Submits the candidate and decodes the analysis. One POST per call, no
    /// retries.
    pub async fn upload(
        &self,
        candidate: &UploadCandidate,
        sample_size: SampleSize,
    ) -> Result<AnalysisResult, PipelineError> {
        let file_part = Part::bytes(candidate.contents().to_vec())
            .file_name(candidate.name().to_string())
            .mime_str(candidate.mime_type())?;
        let form = Form::new()
            .part("file", file_part)
            .text("sample_size", sample_size.to_string());

        tracing::debug!(url = %self.upload_url, "Posting dataset to analysis service");

        let response = self
            .http_client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        tracing::info!(status = status.as_u16(), body_bytes = body.len(), "Analysis service responded");

        if !status.is_success() {
            let message = serde_json::from_slice::<ServiceErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail_message().map(str::to_string))
                .unwrap_or_else(|| format!("{} (HTTP {})", GENERIC_FAILURE, status.as_u16()));
            return Err(PipelineError::transport(message));
        }

        AnalysisResult::from_slice(&body)
    }
}
