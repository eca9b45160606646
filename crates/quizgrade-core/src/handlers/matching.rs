//! Matching questions: pair each left item with its right item.
//!
//! The score is the fraction of pairs matched correctly, so the maximum is
//! always 1 regardless of how many pairs there are.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::QuestionKind;
use crate::render::{flag_or, seeded_shuffle, str_or, with_answer_schema};
use crate::results::GradingResult;
use crate::traits::QuestionHandler;
use crate::values::{parse_or_default, scalar_text};

const DEFAULT_INSTRUCTIONS: &str =
    "Match each item on the left with the correct item on the right.";

#[derive(Debug, Deserialize)]
struct MatchingDefinition {
    question_text: String,
    matching_pairs: Vec<Pair>,
}

#[derive(Debug, Clone, Deserialize)]
struct Pair {
    left: String,
    right: String,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingResponse {
    #[serde(default, alias = "matches")]
    pairs: Vec<Value>,
}

/// A learner-proposed pair; tolerant of missing or non-text sides.
fn proposed_pair(value: &Value) -> Option<(String, String)> {
    let left = value.get("left").and_then(scalar_text)?;
    let right = value.get("right").and_then(scalar_text)?;
    Some((left, right))
}

fn dedup(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

pub struct MatchingHandler;

impl QuestionHandler for MatchingHandler {
    fn kind(&self) -> QuestionKind {
        QuestionKind::Matching
    }

    fn validate(&self, definition: &Value) -> bool {
        let Ok(def) = MatchingDefinition::deserialize(definition) else {
            return false;
        };
        !def.question_text.trim().is_empty()
            && !def.matching_pairs.is_empty()
            && def
                .matching_pairs
                .iter()
                .enumerate()
                .all(|(i, p)| def.matching_pairs[..i].iter().all(|prev| prev.left != p.left))
    }

    fn grade(&self, definition: &Value, _answer_schema: &Value, response: &Value) -> GradingResult {
        let Ok(def) = MatchingDefinition::deserialize(definition) else {
            return GradingResult::invalid_definition(1.0);
        };
        let response: MatchingResponse = parse_or_default(response);
        let total = def.matching_pairs.len();

        // First proposal for each left item counts; repeats are ignored.
        let mut answered: Vec<String> = Vec::new();
        let mut correct_count = 0usize;
        for (left, right) in response.pairs.iter().filter_map(proposed_pair) {
            if answered.contains(&left) {
                continue;
            }
            if def
                .matching_pairs
                .iter()
                .any(|p| p.left == left && p.right == right)
            {
                correct_count += 1;
            }
            answered.push(left);
        }

        let score = if total > 0 {
            correct_count as f64 / total as f64
        } else {
            0.0
        };
        let correct_matches: serde_json::Map<String, Value> = def
            .matching_pairs
            .iter()
            .map(|p| (p.left.clone(), Value::String(p.right.clone())))
            .collect();

        GradingResult::new(
            score,
            1.0,
            total > 0 && correct_count == total,
            format!("You got {correct_count} out of {total} matches correct."),
        )
        .with_details(json!({
            "correct_matches": correct_matches,
            "student_matches": response.pairs,
            "correct_count": correct_count,
            "total_matches": total,
        }))
    }

    fn render_for_learner(&self, definition: &Value) -> Value {
        let pairs = definition
            .get("matching_pairs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let side = |key: &str| dedup(pairs.iter().filter_map(|p| p.get(key).and_then(scalar_text)));

        let left_items = side("left");
        let mut right_items = side("right");
        if flag_or(definition, "shuffle_right", true) {
            seeded_shuffle(&mut right_items, definition);
        }

        json!({
            "question_text": definition.get("question_text").cloned().unwrap_or(Value::Null),
            "left_items": left_items,
            "right_items": right_items,
            "instructions": str_or(definition, "instructions", DEFAULT_INSTRUCTIONS),
        })
    }

    fn render_for_reviewer(&self, definition: &Value, answer_schema: &Value) -> Value {
        with_answer_schema(definition, answer_schema)
    }

    fn default_definition(&self) -> Value {
        json!({
            "question_text": "",
            "matching_pairs": [
                {"left": "", "right": ""},
                {"left": "", "right": ""},
                {"left": "", "right": ""},
            ],
            "shuffle_right": true,
            "instructions": DEFAULT_INSTRUCTIONS,
        })
    }

    fn default_answer_schema(&self) -> Value {
        json!({
            "partial_credit": true,
            "all_or_nothing": false,
        })
    }

    fn validate_response(&self, response: &Value) -> bool {
        ["pairs", "matches"]
            .iter()
            .any(|key| response.get(key).is_some_and(Value::is_array))
    }

    fn normalize_response(&self, _definition: &Value, raw: &Value) -> Value {
        match raw {
            Value::Object(_) => raw.clone(),
            Value::Array(pairs) => json!({ "pairs": pairs }),
            _ => json!({ "pairs": [] }),
        }
    }
}
