//! Per question type aggregate statistics over submission reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::QuestionKind;
use crate::report::SubmissionReport;
use crate::values::round2;

/// Aggregate outcome for one question kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindStats {
    /// Graded items of this kind, manual ones included.
    pub count: usize,
    /// Items with a final automatic score.
    pub graded: usize,
    /// Items waiting for a human grader.
    pub pending_manual: usize,
    /// Items judged fully correct.
    pub correct: usize,
    /// Mean percentage over the `graded` items.
    pub average_percentage: f64,
}

/// Summarize one or more reports by question kind, ordered by kind.
pub fn summarize_by_kind<'a>(
    reports: impl IntoIterator<Item = &'a SubmissionReport>,
) -> BTreeMap<QuestionKind, KindStats> {
    let mut stats: BTreeMap<QuestionKind, KindStats> = BTreeMap::new();
    let mut percentage_sums: BTreeMap<QuestionKind, f64> = BTreeMap::new();

    for item in reports.into_iter().flat_map(|r| &r.items) {
        let entry = stats.entry(item.kind).or_default();
        entry.count += 1;
        if item.result.needs_manual_grading {
            entry.pending_manual += 1;
            continue;
        }
        entry.graded += 1;
        if item.result.is_correct == Some(true) {
            entry.correct += 1;
        }
        *percentage_sums.entry(item.kind).or_default() += item.result.percentage;
    }

    for (kind, entry) in stats.iter_mut() {
        if entry.graded > 0 {
            let sum = percentage_sums.get(kind).copied().unwrap_or_default();
            entry.average_percentage = round2(sum / entry.graded as f64);
        }
    }

    stats
}
