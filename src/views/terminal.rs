//! Plain-text rendering of run progress and report sections.

use std::fmt::{self, Write};

use crate::services::progress::{ProgressSnapshot, PIPELINE_STEPS};
use crate::services::UploadCandidate;
use crate::views::report::{ReportSection, ReportView};

const BAR_WIDTH: usize = 30;

pub fn progress_line(snapshot: &ProgressSnapshot) -> String {
    let filled = snapshot.progress() as usize * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%  Step {} of {}: {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        snapshot.progress(),
        snapshot.step_index() + 1,
        PIPELINE_STEPS.len(),
        snapshot.step_name()
    )
}

pub fn header(candidate: Option<&UploadCandidate>, view: &ReportView) -> String {
    format!(
        "{} • {} rows • {} columns",
        candidate.map(UploadCandidate::name).unwrap_or("dataset"),
        view.overview.rows,
        view.overview.columns
    )
}

pub fn render_section(view: &ReportView, section: ReportSection) -> Result<String, fmt::Error> {
    let mut out = String::new();
    match section {
        ReportSection::Overview => overview(&mut out, view)?,
        ReportSection::Quality => quality(&mut out, view)?,
        ReportSection::Bias => bias(&mut out, view)?,
        ReportSection::Privacy => privacy(&mut out, view)?,
        ReportSection::Recommendations => recommendations(&mut out, view)?,
    }
    Ok(out)
}

/// Sections in the order given, separated by a blank line.
pub fn render_all(view: &ReportView, sections: &[ReportSection]) -> Result<String, fmt::Error> {
    let rendered = sections
        .iter()
        .map(|&section| render_section(view, section))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n"))
}

fn heading(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "== {} ==", title)
}

fn overview(out: &mut String, view: &ReportView) -> fmt::Result {
    let o = &view.overview;
    heading(out, "Overview")?;
    writeln!(out, "Rows: {}  Columns: {}", o.rows, o.columns)?;
    writeln!(out)?;
    writeln!(out, "Dataset Preview")?;
    writeln!(out, "{}", o.column_names.join(" | "))?;
    for row in &o.preview {
        writeln!(out, "{}", row.join(" | "))?;
    }
    writeln!(out)?;
    writeln!(out, "Dataset Domain: {}", o.domain)?;
    writeln!(out, "Column Meanings")?;
    for (column, meaning) in &o.column_meanings {
        writeln!(out, "  {}: {}", column, meaning)?;
    }
    writeln!(out)?;
    writeln!(out, "Compliance")?;
    for check in &o.compliance {
        let mark = if check.passed { "ok" } else { "!!" };
        writeln!(out, "  [{}] {}: {}", mark, check.label, check.message)?;
    }
    Ok(())
}

fn quality(out: &mut String, view: &ReportView) -> fmt::Result {
    let q = &view.quality;
    heading(out, "Quality")?;
    writeln!(out, "Missing Values")?;
    for row in &q.missing_values {
        writeln!(out, "  {}: {} ({}%)", row.column, row.count, row.percent)?;
    }
    writeln!(out, "Duplicate Rows: {} ({}% of total rows)", q.duplicates, q.duplicate_percent)?;
    writeln!(out)?;
    writeln!(out, "Improvement Suggestions")?;
    writeln!(out, "{}", q.suggestions)
}

fn bias(out: &mut String, view: &ReportView) -> fmt::Result {
    let b = &view.bias;
    heading(out, "Bias")?;
    writeln!(out, "Distribution Analysis")?;
    for distribution in &b.distributions {
        writeln!(out, "  {}", distribution.column)?;
        for (value, pct) in &distribution.frequencies {
            writeln!(out, "    {}: {}%", value, pct)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Bias Insights")?;
    writeln!(out, "{}", b.analysis)
}

fn privacy(out: &mut String, view: &ReportView) -> fmt::Result {
    let p = &view.privacy;
    heading(out, "Privacy")?;
    writeln!(out, "Potential PII Columns")?;
    if p.pii_columns.is_empty() {
        writeln!(out, "  No PII columns detected")?;
    } else {
        for column in &p.pii_columns {
            writeln!(out, "  - {}", column)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Privacy Recommendations")?;
    writeln!(out, "{}", p.suggestions)?;
    writeln!(out)?;
    writeln!(out, "Data Lineage")?;
    for (key, value) in &p.lineage {
        writeln!(out, "  {}: {}", key, value)?;
    }
    Ok(())
}

fn recommendations(out: &mut String, view: &ReportView) -> fmt::Result {
    heading(out, "Recommendations")?;
    for (category, description) in &view.recommendations.items {
        writeln!(out, "[{}]", category)?;
        writeln!(out, "  {}", description)?;
    }
    Ok(())
}
