use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PipelineError;

/// One preview row: column name to scalar or null.
pub type PreviewRow = Map<String, Value>;

/// Snapshot returned by `POST /api/upload`.
///
/// Field names mirror the service's snake_case JSON. Unknown extra fields are
/// ignored; missing ones fail deserialization. Every keyed mapping keeps the
/// order the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub message: Option<String>,
    pub dataset_preview: Vec<PreviewRow>,
    pub dataset_stats: DatasetStats,
    pub initial_analysis: InitialAnalysis,
    pub quality_report: QualityReport,
    pub bias_results: BiasResults,
    pub privacy_results: PrivacyResults,
    pub lineage_info: Map<String, Value>,
    pub compliance_report: ComplianceReport,
    pub recommendations: RecommendationList,
    pub full_report: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub rows: u64,
    pub columns: u64,
    pub column_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialAnalysis {
    pub domain: String,
    pub column_meanings: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub missing_values: IndexMap<String, u64>,
    pub duplicates: u64,
    pub suggestions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasResults {
    /// column -> value -> frequency fraction
    pub distributions: IndexMap<String, IndexMap<String, f64>>,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyResults {
    pub pii_columns: Vec<String>,
    pub suggestions: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub missing_values_check: bool,
    pub pii_check: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationList {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub description: String,
}

/// Error body returned alongside a non-2xx status.
#[derive(Debug, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ServiceErrorBody {
    /// The `detail` field, only when it is a non-empty string.
    pub fn detail_message(&self) -> Option<&str> {
        match &self.detail {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

impl AnalysisResult {
    /// Decodes and validates a success body.
    pub fn from_slice(body: &[u8]) -> Result<Self, PipelineError> {
        let result: AnalysisResult = serde_json::from_slice(body)?;
        result.validate()?;
        Ok(result)
    }

    /// Checks the value-level constraints serde cannot express.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for (i, row) in self.dataset_preview.iter().enumerate() {
            if let Some((column, _)) = row
                .iter()
                .find(|(_, v)| matches!(v, Value::Array(_) | Value::Object(_)))
            {
                return Err(malformed(format!(
                    "preview row {} column '{}' is not a scalar",
                    i, column
                )));
            }
        }

        for (column, distribution) in &self.bias_results.distributions {
            for (value, frequency) in distribution {
                if !frequency.is_finite() || !(0.0..=1.0).contains(frequency) {
                    return Err(malformed(format!(
                        "frequency {} for '{}' in column '{}' is outside [0, 1]",
                        frequency, value, column
                    )));
                }
            }
        }

        Ok(())
    }
}

fn malformed(detail: String) -> PipelineError {
    PipelineError::transport(format!("Malformed analysis response: {}", detail))
}
