//! Essay questions. Always deferred to a human grader.

use serde_json::{json, Value};

use super::short_answer::{answer_text, normalize_text_response};
use crate::model::QuestionKind;
use crate::render::str_or;
use crate::results::GradingResult;
use crate::traits::QuestionHandler;
use crate::values::as_number;

const DEFAULT_INSTRUCTIONS: &str = "Provide a detailed response in essay format.";

fn field_or(definition: &Value, key: &str, default: Value) -> Value {
    definition
        .get(key)
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or(default)
}

pub struct LongAnswerHandler;

impl QuestionHandler for LongAnswerHandler {
    fn kind(&self) -> QuestionKind {
        QuestionKind::LongAnswer
    }

    fn validate(&self, definition: &Value) -> bool {
        definition
            .get("question_text")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.trim().is_empty())
    }

    fn grade(&self, _definition: &Value, answer_schema: &Value, response: &Value) -> GradingResult {
        let max_marks = answer_schema
            .get("max_marks")
            .and_then(as_number)
            .unwrap_or(1.0);
        let answer = answer_text(response);

        GradingResult::deferred(max_marks, "This response requires manual grading.").with_details(
            json!({
                "response_length": answer.chars().count(),
                "response_word_count": answer.split_whitespace().count(),
            }),
        )
    }

    fn render_for_learner(&self, definition: &Value) -> Value {
        json!({
            "question_text": str_or(definition, "question_text", ""),
            "instructions": str_or(definition, "instructions", DEFAULT_INSTRUCTIONS),
            "expected_structure": field_or(definition, "expected_structure", json!([])),
            "rich_text_enabled": true,
        })
    }

    fn render_for_reviewer(&self, definition: &Value, answer_schema: &Value) -> Value {
        json!({
            "question_text": str_or(definition, "question_text", ""),
            "instructions": str_or(definition, "instructions", ""),
            "rubric_criteria": field_or(definition, "rubric_criteria", json!([])),
            "expected_structure": field_or(definition, "expected_structure", json!([])),
            "grading_notes": str_or(definition, "grading_notes", ""),
            "sample_answer": str_or(definition, "sample_answer", ""),
            "answer_schema": answer_schema,
        })
    }

    fn default_definition(&self) -> Value {
        json!({
            "question_text": "",
            "instructions": "Provide a detailed response in essay format. Structure your answer clearly and support your points with examples.",
            "rubric_criteria": [
                {"criterion": "Content Knowledge", "points": 40, "description": "Demonstrates understanding of key concepts"},
                {"criterion": "Organization", "points": 20, "description": "Clear structure and logical flow"},
                {"criterion": "Evidence/Examples", "points": 20, "description": "Uses relevant examples and evidence"},
                {"criterion": "Writing Quality", "points": 20, "description": "Grammar, vocabulary, and clarity"},
            ],
            "expected_structure": ["Introduction", "Body Paragraphs", "Conclusion"],
            "grading_notes": "",
            "sample_answer": "",
        })
    }

    fn default_answer_schema(&self) -> Value {
        json!({
            "grading_type": "manual",
            "max_marks": 10,
            "rubric_based": true,
            "allows_rich_text": true,
        })
    }

    fn validate_response(&self, response: &Value) -> bool {
        response
            .get("answer")
            .and_then(Value::as_str)
            .is_some_and(|a| !a.trim().is_empty())
    }

    fn normalize_response(&self, _definition: &Value, raw: &Value) -> Value {
        normalize_text_response(raw)
    }
}
