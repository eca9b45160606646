//! Checked grading façade.
//!
//! Handlers trust their inputs. The engine resolves the handler for a stored
//! question, checks the definition and the response shape, and only then
//! grades, turning every rejection into a [`GradingError`].

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;

use crate::error::GradingError;
use crate::model::{QuestionBank, QuestionDefinition};
use crate::registry;
use crate::report::{GradingFailure, SubmissionReport};
use crate::results::GradedQuestion;
use crate::traits::QuestionHandler;

/// Which rendering of a question to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Redacted: safe to show the person answering.
    Learner,
    /// Complete, including answers and grading policy.
    Reviewer,
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learner" => Ok(View::Learner),
            "reviewer" => Ok(View::Reviewer),
            other => Err(format!("unknown view '{other}', expected learner or reviewer")),
        }
    }
}

/// Resolve the handler for `question` and check its definition.
fn checked_handler(
    question: &QuestionDefinition,
) -> Result<&'static dyn QuestionHandler, GradingError> {
    let handler = registry::handler_for(&question.question_type)?;
    if !handler.validate(&question.definition) {
        return Err(GradingError::InvalidDefinition {
            question: question.id.clone(),
            kind: handler.kind(),
        });
    }
    Ok(handler)
}

/// Grade one response and scale the result onto the question's marks.
pub fn grade_question(
    question: &QuestionDefinition,
    response: &Value,
) -> Result<GradedQuestion, GradingError> {
    let handler = checked_handler(question)?;
    let kind = handler.kind();

    if !handler.validate_response(response) {
        return Err(GradingError::InvalidResponse {
            question: question.id.clone(),
            kind,
        });
    }

    tracing::debug!(question = %question.id, %kind, "grading response");
    let result = handler.grade(&question.definition, &question.answer_schema, response);
    tracing::debug!(
        question = %question.id,
        score = result.score,
        max_score = result.max_score,
        manual = result.needs_manual_grading,
        "graded"
    );

    Ok(GradedQuestion::from_result(
        question.id.clone(),
        kind,
        question.marks,
        result,
    ))
}

/// Grade every question of `bank` in order. A question that cannot be graded
/// is recorded as a failure and never aborts the rest.
pub fn grade_submission(bank: &QuestionBank, responses: &HashMap<String, Value>) -> SubmissionReport {
    let mut items = Vec::with_capacity(bank.questions.len());
    let mut failures = Vec::new();

    for question in &bank.questions {
        let outcome = match responses.get(&question.id) {
            Some(response) => grade_question(question, response),
            None => Err(GradingError::MissingResponse(question.id.clone())),
        };
        match outcome {
            Ok(graded) => items.push(graded),
            Err(e) => {
                tracing::warn!(question = %question.id, error = %e, "question not graded");
                failures.push(GradingFailure::from_error(&question.id, &e));
            }
        }
    }

    let known: std::collections::HashSet<&str> =
        bank.questions.iter().map(|q| q.id.as_str()).collect();
    for id in responses.keys().filter(|id| !known.contains(id.as_str())) {
        tracing::warn!(question = %id, "response for unknown question ignored");
    }

    let report = SubmissionReport::new(bank, items, failures, Utc::now());
    tracing::info!(
        bank = %bank.id,
        graded = report.items.len(),
        failed = report.failures.len(),
        pending_manual = report.pending_manual,
        "submission graded"
    );
    report
}

/// Render a stored question for the requested audience.
pub fn render_question(question: &QuestionDefinition, view: View) -> Result<Value, GradingError> {
    let handler = checked_handler(question)?;
    tracing::debug!(question = %question.id, kind = %handler.kind(), ?view, "rendering");

    Ok(match view {
        View::Learner => handler.render_for_learner(&question.definition),
        View::Reviewer => handler.render_for_reviewer(&question.definition, &question.answer_schema),
    })
}
