//! Short free-text answers.
//!
//! The answer schema picks the grading mode, first match wins: exact match
//! against a model answer, then key-point detection, then deferral to a
//! human grader.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::QuestionKind;
use crate::render::{str_or, with_answer_schema};
use crate::results::GradingResult;
use crate::traits::QuestionHandler;
use crate::values::{
    as_number, deserialize_lenient_text, deserialize_text_list, deserialize_truthy,
    parse_or_default, scalar_text,
};

const DEFAULT_MAX_LENGTH: u64 = 500;
const DEFAULT_MIN_LENGTH: u64 = 1;
const DEFAULT_PLACEHOLDER: &str = "Enter your answer here...";

/// Grading policy. A field of the wrong type falls back to its own default
/// without discarding the rest of the schema.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ShortAnswerSchema {
    #[serde(deserialize_with = "deserialize_lenient_text")]
    model_answer: String,
    #[serde(deserialize_with = "deserialize_text_list")]
    key_points: Vec<String>,
    #[serde(deserialize_with = "deserialize_max_marks")]
    max_marks: f64,
    #[serde(deserialize_with = "deserialize_truthy")]
    case_sensitive: bool,
    #[serde(deserialize_with = "deserialize_truthy")]
    exact_match: bool,
    #[serde(deserialize_with = "deserialize_truthy")]
    requires_manual_review: bool,
}

impl Default for ShortAnswerSchema {
    fn default() -> Self {
        Self {
            model_answer: String::new(),
            key_points: Vec::new(),
            max_marks: 1.0,
            case_sensitive: false,
            exact_match: false,
            requires_manual_review: true,
        }
    }
}

fn deserialize_max_marks<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value).filter(|m| *m >= 0.0).unwrap_or(1.0))
}

#[derive(Debug, Default, Deserialize)]
struct TextResponse {
    #[serde(default)]
    answer: Option<Value>,
}

impl TextResponse {
    fn text(&self) -> String {
        self.answer
            .as_ref()
            .and_then(scalar_text)
            .unwrap_or_default()
    }
}

/// Text answer carried by a short or long answer response.
pub(crate) fn answer_text(response: &Value) -> String {
    parse_or_default::<TextResponse>(response).text()
}

/// Wrap a bare scalar as `{answer: text}`.
pub(crate) fn normalize_text_response(raw: &Value) -> Value {
    match raw {
        Value::Object(_) => raw.clone(),
        Value::Null => json!({}),
        other => match scalar_text(other) {
            Some(text) => json!({ "answer": text }),
            None => json!({}),
        },
    }
}

fn grade_exact(schema: &ShortAnswerSchema, answer: &str) -> GradingResult {
    let is_correct = if schema.case_sensitive {
        answer == schema.model_answer
    } else {
        answer.to_lowercase() == schema.model_answer.to_lowercase()
    };
    let (score, feedback) = if is_correct {
        (schema.max_marks, "Correct answer!")
    } else {
        (0.0, "Incorrect answer.")
    };
    GradingResult::new(score, schema.max_marks, is_correct, feedback).with_details(json!({
        "expected": schema.model_answer,
        "provided": answer,
    }))
}

fn grade_key_points(schema: &ShortAnswerSchema, answer: &str) -> GradingResult {
    let haystack = answer.to_lowercase();
    let (found, missed): (Vec<&String>, Vec<&String>) = schema
        .key_points
        .iter()
        .partition(|point| haystack.contains(&point.to_lowercase()));

    let score = found.len() as f64;
    let max_score = schema.key_points.len() as f64;
    let feedback = if found.is_empty() {
        "No key points identified in the answer.".to_string()
    } else {
        let found_list: Vec<&str> = found.iter().map(|p| p.as_str()).collect();
        format!(
            "Found {} out of {} key points: {}",
            found.len(),
            schema.key_points.len(),
            found_list.join(", ")
        )
    };

    GradingResult::new(score, max_score, missed.is_empty(), feedback)
        .with_details(json!({
            "key_points_found": found,
            "key_points_missed": missed,
            "total_key_points": schema.key_points.len(),
        }))
        .requiring_review(schema.requires_manual_review)
}

pub struct ShortAnswerHandler;

impl QuestionHandler for ShortAnswerHandler {
    fn kind(&self) -> QuestionKind {
        QuestionKind::ShortAnswer
    }

    fn validate(&self, definition: &Value) -> bool {
        definition
            .get("question_text")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.trim().is_empty())
    }

    fn grade(&self, _definition: &Value, answer_schema: &Value, response: &Value) -> GradingResult {
        let schema: ShortAnswerSchema = parse_or_default(answer_schema);
        let text = answer_text(response);
        let answer = text.trim();

        if answer.is_empty() {
            return GradingResult::new(0.0, schema.max_marks, false, "No answer provided.");
        }
        if schema.exact_match {
            return grade_exact(&schema, answer);
        }
        if !schema.key_points.is_empty() {
            return grade_key_points(&schema, answer);
        }

        GradingResult::deferred(schema.max_marks, "This answer requires manual grading.")
            .with_details(json!({
                "student_answer": answer,
                "model_answer": schema.model_answer,
            }))
    }

    fn render_for_learner(&self, definition: &Value) -> Value {
        json!({
            "question_text": definition.get("question_text").cloned().unwrap_or(Value::Null),
            "question_image": definition.get("question_image").cloned().unwrap_or(Value::Null),
            "max_length": definition
                .get("max_length")
                .and_then(Value::as_u64)
                .unwrap_or(DEFAULT_MAX_LENGTH),
            "min_length": definition
                .get("min_length")
                .and_then(Value::as_u64)
                .unwrap_or(DEFAULT_MIN_LENGTH),
            "placeholder": str_or(definition, "placeholder", DEFAULT_PLACEHOLDER),
        })
    }

    fn render_for_reviewer(&self, definition: &Value, answer_schema: &Value) -> Value {
        with_answer_schema(definition, answer_schema)
    }

    fn default_definition(&self) -> Value {
        json!({
            "question_text": "",
            "question_image": null,
            "max_length": DEFAULT_MAX_LENGTH,
            "min_length": DEFAULT_MIN_LENGTH,
            "placeholder": DEFAULT_PLACEHOLDER,
        })
    }

    fn default_answer_schema(&self) -> Value {
        json!({
            "model_answer": "",
            "key_points": [],
            "max_marks": 1,
            "case_sensitive": false,
            "exact_match": false,
            "requires_manual_review": true,
        })
    }

    fn validate_response(&self, response: &Value) -> bool {
        response.get("answer").is_some_and(Value::is_string)
    }

    fn normalize_response(&self, _definition: &Value, raw: &Value) -> Value {
        normalize_text_response(raw)
    }
}
