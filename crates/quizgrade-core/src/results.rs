//! Grading result types.
//!
//! [`GradingResult`] is the generic envelope every handler returns; it never
//! carries handler-specific types, only JSON `details`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::QuestionKind;
use crate::values::round2;

/// Outcome of grading one response against one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    /// Raw score, `0 <= score <= max_score`.
    pub score: f64,
    /// Maximum raw score for this question under its handler's policy.
    pub max_score: f64,
    /// `score / max_score` as a percentage, rounded to two decimals.
    pub percentage: f64,
    /// `None` while the response awaits a human reviewer.
    pub is_correct: Option<bool>,
    /// Human-readable feedback.
    pub feedback: String,
    /// Handler-specific breakdown.
    #[serde(default)]
    pub details: Map<String, Value>,
    /// Set when the outcome is deferred to manual grading.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_manual_grading: bool,
}

impl GradingResult {
    /// Build a result, deriving the percentage from score and max score.
    pub fn new(score: f64, max_score: f64, is_correct: bool, feedback: impl Into<String>) -> Self {
        Self {
            score,
            max_score,
            percentage: percentage_of(score, max_score),
            is_correct: Some(is_correct),
            feedback: feedback.into(),
            details: Map::new(),
            needs_manual_grading: false,
        }
    }

    /// A zero-score result awaiting manual review.
    pub fn deferred(max_score: f64, feedback: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            max_score,
            percentage: 0.0,
            is_correct: None,
            feedback: feedback.into(),
            details: Map::new(),
            needs_manual_grading: true,
        }
    }

    /// Zero score returned when a definition cannot be interpreted.
    pub fn invalid_definition(max_score: f64) -> Self {
        Self::new(0.0, max_score, false, "Question definition could not be read.")
    }

    pub fn with_details(mut self, details: Value) -> Self {
        if let Value::Object(map) = details {
            self.details = map;
        }
        self
    }

    /// Flag the result for manual review. A flagged result has no verdict yet.
    pub fn requiring_review(mut self, needs_review: bool) -> Self {
        if needs_review {
            self.needs_manual_grading = true;
            self.is_correct = None;
        }
        self
    }

    /// Fraction of the maximum score achieved, `0.0` when nothing is gradable.
    pub fn ratio(&self) -> f64 {
        if self.max_score > 0.0 {
            self.score / self.max_score
        } else {
            0.0
        }
    }
}

/// Percentage of `score` over `max_score`, rounded to two decimals.
pub fn percentage_of(score: f64, max_score: f64) -> f64 {
    if max_score > 0.0 {
        round2(score / max_score * 100.0)
    } else {
        0.0
    }
}

/// A graded question scaled onto the marks it is worth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedQuestion {
    pub question_id: String,
    pub kind: QuestionKind,
    /// Marks available for this question.
    pub marks: f64,
    /// Marks earned, `None` while manual grading is pending.
    pub marks_awarded: Option<f64>,
    pub result: GradingResult,
}

impl GradedQuestion {
    pub fn from_result(
        question_id: impl Into<String>,
        kind: QuestionKind,
        marks: f64,
        result: GradingResult,
    ) -> Self {
        let marks_awarded = if result.needs_manual_grading {
            None
        } else {
            Some(round2(marks * result.ratio()))
        };
        Self {
            question_id: question_id.into(),
            kind,
            marks,
            marks_awarded,
            result,
        }
    }
}
