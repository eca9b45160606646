//! Submission report types with JSON persistence and Markdown output.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GradingError;
use crate::model::QuestionBank;
use crate::results::{percentage_of, GradedQuestion};
use crate::values::round2;

/// The graded outcome of one submission against one question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// The bank the submission answered.
    pub bank_id: String,
    /// When the submission was graded.
    pub created_at: DateTime<Utc>,
    /// Graded questions, in bank order.
    pub items: Vec<GradedQuestion>,
    /// Marks available across the whole bank.
    pub total_marks: f64,
    /// Marks earned so far. Pending manual grades contribute nothing.
    pub marks_awarded: f64,
    /// `marks_awarded` as a percentage of `total_marks`.
    pub percentage: f64,
    /// Number of items waiting for a human grader.
    pub pending_manual: usize,
    /// Questions that could not be graded.
    #[serde(default)]
    pub failures: Vec<GradingFailure>,
}

/// A question the engine refused to grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingFailure {
    pub question_id: String,
    /// Machine-readable error label, see [`GradingError::code`].
    pub code: String,
    pub message: String,
}

impl GradingFailure {
    pub fn from_error(question_id: &str, error: &GradingError) -> Self {
        Self {
            question_id: question_id.to_string(),
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

impl SubmissionReport {
    /// Assemble a report, deriving the totals from the graded items.
    pub fn new(
        bank: &QuestionBank,
        items: Vec<GradedQuestion>,
        failures: Vec<GradingFailure>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let total_marks = bank.total_marks();
        let marks_awarded = round2(items.iter().filter_map(|i| i.marks_awarded).sum());
        let pending_manual = items.iter().filter(|i| i.marks_awarded.is_none()).count();

        Self {
            bank_id: bank.id.clone(),
            created_at,
            items,
            total_marks,
            marks_awarded,
            percentage: percentage_of(marks_awarded, total_marks),
            pending_manual,
            failures,
        }
    }

    /// Returns true if any question could not be graded.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SubmissionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## Submission report: {}\n\n", self.bank_id));
        md.push_str(&format!(
            "**Score:** {:.2} / {:.2} ({:.1}%), {} pending manual grading, {} not graded\n\n",
            self.marks_awarded,
            self.total_marks,
            self.percentage,
            self.pending_manual,
            self.failures.len()
        ));

        if !self.items.is_empty() {
            md.push_str("| Question | Type | Marks | Awarded | Feedback |\n");
            md.push_str("|----------|------|-------|---------|----------|\n");
            for item in &self.items {
                let awarded = match item.marks_awarded {
                    Some(m) => format!("{m:.2}"),
                    None => "pending".to_string(),
                };
                md.push_str(&format!(
                    "| {} | {} | {:.2} | {} | {} |\n",
                    item.question_id,
                    item.kind,
                    item.marks,
                    awarded,
                    item.result.feedback.replace('|', "\\|")
                ));
            }
            md.push('\n');
        }

        if !self.failures.is_empty() {
            md.push_str("### Not graded\n\n");
            for f in &self.failures {
                md.push_str(&format!("- `{}` ({}): {}\n", f.question_id, f.code, f.message));
            }
        }

        md
    }
}
