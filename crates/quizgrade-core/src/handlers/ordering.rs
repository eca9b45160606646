//! Ordering questions. A response earns credit only if the whole sequence
//! matches the authoritative order.

use serde_json::{json, Value};

use crate::model::QuestionKind;
use crate::render::{flag_or, seeded_shuffle, str_or, with_answer_schema};
use crate::results::GradingResult;
use crate::traits::QuestionHandler;

const DEFAULT_INSTRUCTIONS: &str = "Arrange the items in the correct order.";

fn non_empty_array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value
        .get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}

pub struct OrderingHandler;

impl QuestionHandler for OrderingHandler {
    fn kind(&self) -> QuestionKind {
        QuestionKind::Ordering
    }

    fn validate(&self, definition: &Value) -> bool {
        let has_text = definition
            .get("question_text")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.trim().is_empty());
        has_text
            && non_empty_array(definition, "items").is_some()
            && non_empty_array(definition, "correct_order").is_some()
    }

    fn grade(&self, definition: &Value, _answer_schema: &Value, response: &Value) -> GradingResult {
        let (Some(correct_order), Some(student_order)) = (
            non_empty_array(definition, "correct_order"),
            non_empty_array(response, "order"),
        ) else {
            return GradingResult::new(0.0, 1.0, false, "Invalid response format.");
        };

        let is_correct = correct_order == student_order;
        let (score, feedback) = if is_correct {
            (1.0, "Correct order!")
        } else {
            (0.0, "Incorrect order.")
        };

        GradingResult::new(score, 1.0, is_correct, feedback).with_details(json!({
            "correct_order": correct_order,
            "student_order": student_order,
        }))
    }

    fn render_for_learner(&self, definition: &Value) -> Value {
        let mut items = definition
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if flag_or(definition, "shuffle", true) {
            seeded_shuffle(&mut items, definition);
        }

        json!({
            "question_text": definition.get("question_text").cloned().unwrap_or(Value::Null),
            "items": items,
            "instructions": str_or(definition, "instructions", DEFAULT_INSTRUCTIONS),
        })
    }

    fn render_for_reviewer(&self, definition: &Value, answer_schema: &Value) -> Value {
        with_answer_schema(definition, answer_schema)
    }

    fn default_definition(&self) -> Value {
        json!({
            "question_text": "",
            "items": [],
            "correct_order": [],
            "shuffle": true,
            "instructions": "",
        })
    }

    fn default_answer_schema(&self) -> Value {
        json!({
            "partial_credit": false,
            "strict_order": true,
        })
    }

    fn validate_response(&self, response: &Value) -> bool {
        response.get("order").is_some_and(Value::is_array)
    }

    fn normalize_response(&self, _definition: &Value, raw: &Value) -> Value {
        match raw {
            Value::Object(_) => raw.clone(),
            Value::Array(order) => json!({ "order": order }),
            _ => json!({ "order": [] }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> Value {
        json!({
            "question_text": "Order the numbers.",
            "items": [3, 1, 2],
            "correct_order": [1, 2, 3],
        })
    }

    #[test]
    fn exact_sequence_scores_one() {
        let r = OrderingHandler.grade(&steps(), &json!({}), &json!({"order": [1, 2, 3]}));
        assert_eq!(r.score, 1.0);
        assert_eq!(r.max_score, 1.0);
        assert_eq!(r.is_correct, Some(true));
        assert_eq!(r.feedback, "Correct order!");
    }

    #[test]
    fn adjacent_swap_scores_zero() {
        let r = OrderingHandler.grade(&steps(), &json!({}), &json!({"order": [2, 1, 3]}));
        assert_eq!(r.score, 0.0);
        assert_eq!(r.is_correct, Some(false));
    }

    #[test]
    fn short_sequence_scores_zero() {
        let r = OrderingHandler.grade(&steps(), &json!({}), &json!({"order": [1, 2]}));
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn empty_order_is_invalid_format() {
        let r = OrderingHandler.grade(&steps(), &json!({}), &json!({"order": []}));
        assert_eq!(r.score, 0.0);
        assert_eq!(r.feedback, "Invalid response format.");
        let r = OrderingHandler.grade(&steps(), &json!({}), &json!({}));
        assert_eq!(r.feedback, "Invalid response format.");
    }

    #[test]
    fn validation_requires_correct_order() {
        assert!(OrderingHandler.validate(&steps()));
        assert!(!OrderingHandler.validate(&json!({
            "question_text": "Q",
            "items": [1, 2]
        })));
        assert!(!OrderingHandler.validate(&OrderingHandler.default_definition()));
    }

    #[test]
    fn learner_view_hides_correct_order() {
        let view = OrderingHandler.render_for_learner(&steps());
        assert!(view.get("correct_order").is_none());
        let mut items: Vec<i64> = view["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        items.sort_unstable();
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(view, OrderingHandler.render_for_learner(&steps()));
    }

    #[test]
    fn array_normalizes_to_order() {
        assert_eq!(
            OrderingHandler.normalize_response(&steps(), &json!([1, 2, 3])),
            json!({"order": [1, 2, 3]})
        );
    }
}
