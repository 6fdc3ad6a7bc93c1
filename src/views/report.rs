//! Display-ready sections of an analysis result.
//!
//! Each section is derived from the result alone and can be rendered without
//! the others.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::models::AnalysisResult;

pub const NULL_CELL: &str = "NULL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportSection {
    Overview,
    Quality,
    Bias,
    Privacy,
    Recommendations,
}

impl ReportSection {
    pub const ALL: [ReportSection; 5] = [
        ReportSection::Overview,
        ReportSection::Quality,
        ReportSection::Bias,
        ReportSection::Privacy,
        ReportSection::Recommendations,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReportSection::Overview => "Overview",
            ReportSection::Quality => "Quality",
            ReportSection::Bias => "Bias",
            ReportSection::Privacy => "Privacy",
            ReportSection::Recommendations => "Recommendations",
        }
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ReportSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportSection::ALL
            .into_iter()
            .find(|section| section.title().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown report section: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceCheck {
    pub label: &'static str,
    pub passed: bool,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewSection {
    pub rows: u64,
    pub columns: u64,
    pub column_names: Vec<String>,
    /// Preview cells as display strings, in `column_names` order.
    pub preview: Vec<Vec<String>>,
    pub domain: String,
    pub column_meanings: Vec<(String, String)>,
    pub compliance: Vec<ComplianceCheck>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissingValueRow {
    pub column: String,
    pub count: u64,
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualitySection {
    pub missing_values: Vec<MissingValueRow>,
    pub duplicates: u64,
    pub duplicate_percent: String,
    pub suggestions: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub column: String,
    /// (value, percent) pairs.
    pub frequencies: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiasSection {
    pub distributions: Vec<Distribution>,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrivacySection {
    pub pii_columns: Vec<String>,
    pub suggestions: String,
    pub lineage: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationsSection {
    pub items: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub overview: OverviewSection,
    pub quality: QualitySection,
    pub bias: BiasSection,
    pub privacy: PrivacySection,
    pub recommendations: RecommendationsSection,
}

impl ReportView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            overview: overview(result),
            quality: quality(result),
            bias: bias(result),
            privacy: privacy(result),
            recommendations: RecommendationsSection {
                items: result
                    .recommendations
                    .recommendations
                    .iter()
                    .map(|r| (r.category.clone(), r.description.clone()))
                    .collect(),
            },
        }
    }
}

/// `part / whole` as a percentage with two decimals; `0.00` when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", part as f64 / whole as f64 * 100.0)
}

pub fn percent(fraction: f64) -> String {
    format!("{:.2}", fraction * 100.0)
}

/// Scalars print bare, null prints as `NULL`, arrays join with `, `.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => NULL_CELL.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn overview(result: &AnalysisResult) -> OverviewSection {
    let stats = &result.dataset_stats;
    let preview = result
        .dataset_preview
        .iter()
        .map(|row| {
            stats
                .column_names
                .iter()
                .map(|column| row.get(column).map(display_value).unwrap_or_else(|| NULL_CELL.to_string()))
                .collect()
        })
        .collect();

    let compliance = &result.compliance_report;
    OverviewSection {
        rows: stats.rows,
        columns: stats.columns,
        column_names: stats.column_names.clone(),
        preview,
        domain: result.initial_analysis.domain.clone(),
        column_meanings: result
            .initial_analysis
            .column_meanings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        compliance: vec![
            ComplianceCheck {
                label: "Missing Values",
                passed: compliance.missing_values_check,
                message: if compliance.missing_values_check {
                    "Missing values are within acceptable limits"
                } else {
                    "Missing values exceed acceptable threshold"
                },
            },
            ComplianceCheck {
                label: "PII Data",
                passed: compliance.pii_check,
                message: if compliance.pii_check {
                    "No PII concerns detected"
                } else {
                    "PII found in dataset"
                },
            },
        ],
    }
}

fn quality(result: &AnalysisResult) -> QualitySection {
    let rows = result.dataset_stats.rows;
    let report = &result.quality_report;
    QualitySection {
        missing_values: report
            .missing_values
            .iter()
            .map(|(column, &count)| MissingValueRow {
                column: column.clone(),
                count,
                percent: percent_of(count, rows),
            })
            .collect(),
        duplicates: report.duplicates,
        duplicate_percent: percent_of(report.duplicates, rows),
        suggestions: report.suggestions.clone(),
    }
}

fn bias(result: &AnalysisResult) -> BiasSection {
    BiasSection {
        distributions: result
            .bias_results
            .distributions
            .iter()
            .map(|(column, values)| Distribution {
                column: column.clone(),
                frequencies: values
                    .iter()
                    .map(|(value, &frequency)| (value.clone(), percent(frequency)))
                    .collect(),
            })
            .collect(),
        analysis: result.bias_results.analysis.clone(),
    }
}

fn privacy(result: &AnalysisResult) -> PrivacySection {
    PrivacySection {
        pii_columns: result.privacy_results.pii_columns.clone(),
        suggestions: result.privacy_results.suggestions.clone(),
        lineage: result
            .lineage_info
            .iter()
            .map(|(key, value)| (key.replace('_', " "), display_value(value)))
            .collect(),
    }
}
