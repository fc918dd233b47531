//! Bookmark export as a quoted CSV document.
//!
//! Fields are wrapped in double quotes as-is. Quotes inside a value are not
//! doubled, so a summary containing `"` yields a row spreadsheet tools may
//! split differently.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::Candidate;
use crate::notice::Notice;
use crate::storage::sanitize_export_filename;

pub const EXPORT_HEADER: &str = "Name,Domain,Location,GPA,Skills,LinkedIn,GitHub,Summary";
const SKILL_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Nothing selected; no file is produced.
    Empty { notice: Notice },
    Ready { export: CsvExport, notice: Notice },
}

impl ExportOutcome {
    pub fn notice(&self) -> &Notice {
        match self {
            ExportOutcome::Empty { notice } | ExportOutcome::Ready { notice, .. } => notice,
        }
    }

    pub fn export(&self) -> Option<&CsvExport> {
        match self {
            ExportOutcome::Empty { .. } => None,
            ExportOutcome::Ready { export, .. } => Some(export),
        }
    }
}

pub fn home_export_filename(access_key: &str) -> String {
    sanitize_export_filename(format!("smarted-bookmarked-profiles-{access_key}").as_str())
}

pub fn hr_export_filename(day: NaiveDate) -> String {
    sanitize_export_filename(format!("hr-bookmarked-profiles-{}", day.format("%Y-%m-%d")).as_str())
}

fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

/// Zero and NaN print as blank, like a missing value.
fn gpa_field(gpa: Option<f64>) -> String {
    match gpa {
        Some(value) if value != 0.0 && !value.is_nan() => value.to_string(),
        _ => String::new(),
    }
}

pub fn candidate_row(candidate: &Candidate) -> String {
    [
        candidate.name.clone(),
        candidate.domain.clone(),
        candidate.location.clone().unwrap_or_default(),
        gpa_field(candidate.gpa),
        candidate.skills.join(SKILL_SEPARATOR),
        candidate.linkedin.clone(),
        candidate.github.clone(),
        candidate.ai_summary.clone(),
    ]
    .iter()
    .map(|field| quoted(field.as_str()))
    .collect::<Vec<_>>()
    .join(",")
}

pub fn candidates_to_csv(candidates: &[Candidate]) -> String {
    let mut lines = Vec::with_capacity(candidates.len() + 1);
    lines.push(EXPORT_HEADER.to_string());
    lines.extend(candidates.iter().map(candidate_row));
    lines.join("\n")
}

/// Builds the download for `candidates`, keeping at most `row_limit` rows.
/// `empty_hint` is the notice text shown when there is nothing to export.
pub fn build_export(
    candidates: &[Candidate],
    filename: String,
    row_limit: usize,
    empty_hint: &str,
) -> ExportOutcome {
    if candidates.is_empty() {
        return ExportOutcome::Empty {
            notice: Notice::info("No Bookmarks", empty_hint),
        };
    }
    let rows = &candidates[..candidates.len().min(row_limit.max(1))];
    if rows.len() < candidates.len() {
        tracing::warn!(
            requested = candidates.len(),
            kept = rows.len(),
            "export truncated to row limit"
        );
    }
    let export = CsvExport {
        filename,
        content: candidates_to_csv(rows),
        count: rows.len(),
    };
    let notice = Notice::info(
        "Export Complete",
        format!("{} profiles exported successfully.", export.count),
    );
    ExportOutcome::Ready { export, notice }
}
