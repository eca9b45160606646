//! Reading comprehension: a passage followed by sub-questions of other types.
//!
//! Each sub-question carries its own `type` and is validated, graded and
//! rendered by that type's handler. Comprehension cannot nest inside itself.

use serde_json::{json, Value};

use crate::model::{empty_object, QuestionKind};
use crate::registry;
use crate::render::str_or;
use crate::results::GradingResult;
use crate::traits::QuestionHandler;

const DEFAULT_INSTRUCTIONS: &str =
    "Read the passage carefully and answer the questions that follow.";

/// Fraction of the aggregate maximum needed for the whole item to count as
/// correct.
pub const PASS_THRESHOLD: f64 = 0.6;

const DEFAULT_SUB_TYPE: &str = "short_answer";

fn sub_questions(definition: &Value) -> &[Value] {
    definition
        .get("sub_questions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Type key of a sub-question; untyped sub-questions are short answers.
pub fn sub_type(sub: &Value) -> &str {
    str_or(sub, "type", DEFAULT_SUB_TYPE)
}

fn sub_marks(sub: &Value) -> f64 {
    sub.get("marks").and_then(Value::as_f64).unwrap_or(1.0)
}

fn sub_schema(sub: &Value) -> Value {
    sub.get("answer_schema")
        .filter(|s| s.is_object())
        .cloned()
        .unwrap_or_else(empty_object)
}

/// Handler for a sub-question, or `None` for unknown or nested types.
fn sub_handler(sub: &Value) -> Option<&'static dyn QuestionHandler> {
    registry::get_handler(sub_type(sub)).filter(|h| h.kind() != QuestionKind::Comprehension)
}

fn passage_view(definition: &Value) -> Value {
    let passage = definition.get("passage").unwrap_or(&Value::Null);
    json!({
        "title": str_or(passage, "title", ""),
        "content": str_or(passage, "content", ""),
        "source": str_or(passage, "source", ""),
    })
}

/// Render every sub-question with `render`, numbering them from 1.
fn render_subs(
    definition: &Value,
    render: impl Fn(&dyn QuestionHandler, &Value) -> Value,
) -> Vec<Value> {
    sub_questions(definition)
        .iter()
        .enumerate()
        .filter_map(|(index, sub)| {
            let Some(handler) = sub_handler(sub) else {
                tracing::warn!(
                    sub_question = index + 1,
                    sub_type = sub_type(sub),
                    "skipping sub-question of unsupported type"
                );
                return None;
            };
            let mut view = render(handler, sub);
            if let Some(map) = view.as_object_mut() {
                map.insert("question_number".into(), json!(index + 1));
                map.insert("marks".into(), json!(sub_marks(sub)));
            }
            Some(view)
        })
        .collect()
}

fn total_marks(definition: &Value) -> f64 {
    sub_questions(definition).iter().map(sub_marks).sum()
}

pub struct ComprehensionHandler;

impl QuestionHandler for ComprehensionHandler {
    fn kind(&self) -> QuestionKind {
        QuestionKind::Comprehension
    }

    fn validate(&self, definition: &Value) -> bool {
        let has_passage = definition
            .get("passage")
            .and_then(|p| p.get("content"))
            .and_then(Value::as_str)
            .is_some_and(|c| !c.trim().is_empty());
        let subs = sub_questions(definition);

        has_passage
            && !subs.is_empty()
            && subs
                .iter()
                .all(|sub| sub_handler(sub).is_some_and(|h| h.validate(sub)))
    }

    fn grade(&self, definition: &Value, _answer_schema: &Value, response: &Value) -> GradingResult {
        let answers = response
            .get("sub_answers")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut score = 0.0;
        let mut max_score = 0.0;
        let mut needs_review = false;
        let mut feedback = Vec::new();
        let mut sub_results = Vec::new();

        for (index, sub) in sub_questions(definition).iter().enumerate() {
            let Some(handler) = sub_handler(sub) else {
                tracing::warn!(
                    sub_question = index + 1,
                    sub_type = sub_type(sub),
                    "skipping sub-question of unsupported type"
                );
                continue;
            };
            let raw = answers.get(index).unwrap_or(&Value::Null);
            let sub_response = handler.normalize_response(sub, raw);
            let result = handler.grade(sub, &sub_schema(sub), &sub_response);

            tracing::debug!(
                sub_question = index + 1,
                kind = %handler.kind(),
                score = result.score,
                max_score = result.max_score,
                "graded sub-question"
            );
            score += result.score;
            max_score += result.max_score;
            needs_review |= result.needs_manual_grading;
            if !result.feedback.is_empty() {
                feedback.push(format!("Q{}: {}", index + 1, result.feedback));
            }
            sub_results.push(json!({
                "question_number": index + 1,
                "type": handler.kind(),
                "result": serde_json::to_value(&result).unwrap_or_default(),
            }));
        }

        let is_correct = max_score > 0.0 && score / max_score >= PASS_THRESHOLD;
        GradingResult::new(score, max_score, is_correct, feedback.join(" | "))
            .with_details(json!({ "sub_question_results": sub_results }))
            .requiring_review(needs_review)
    }

    fn render_for_learner(&self, definition: &Value) -> Value {
        json!({
            "passage": passage_view(definition),
            "instructions": str_or(definition, "instructions", DEFAULT_INSTRUCTIONS),
            "sub_questions": render_subs(definition, |h, sub| h.render_for_learner(sub)),
            "total_marks": total_marks(definition),
        })
    }

    fn render_for_reviewer(&self, definition: &Value, answer_schema: &Value) -> Value {
        json!({
            "passage": passage_view(definition),
            "instructions": str_or(definition, "instructions", ""),
            "sub_questions": render_subs(definition, |h, sub| {
                h.render_for_reviewer(sub, &sub_schema(sub))
            }),
            "total_marks": total_marks(definition),
            "answer_schema": answer_schema,
        })
    }

    fn default_definition(&self) -> Value {
        let options: Vec<Value> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| json!({"id": id, "text": "", "is_correct": false}))
            .collect();
        json!({
            "passage": {"title": "", "content": "", "source": ""},
            "instructions": DEFAULT_INSTRUCTIONS,
            "sub_questions": [{
                "type": "mcq",
                "question_text": "",
                "options": options,
                "marks": 2,
                "answer_schema": {},
            }],
        })
    }

    fn default_answer_schema(&self) -> Value {
        json!({
            "grading_type": "automatic",
            "pass_threshold": PASS_THRESHOLD,
        })
    }

    fn validate_response(&self, response: &Value) -> bool {
        response
            .get("sub_answers")
            .and_then(Value::as_array)
            .is_some_and(|a| !a.is_empty())
    }

    fn normalize_response(&self, _definition: &Value, raw: &Value) -> Value {
        match raw {
            Value::Object(_) => raw.clone(),
            Value::Array(answers) => json!({ "sub_answers": answers }),
            _ => empty_object(),
        }
    }
}
