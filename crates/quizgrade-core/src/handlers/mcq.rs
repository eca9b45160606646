//! Multiple choice questions.
//!
//! Options may omit their `id`; a missing id is synthesized from the option's
//! position (`a`, `b`, `c`, ...) identically in grading and rendering.

use serde::Deserialize;
use serde_json::{json, Value};

use super::choice::{self, Choice, Selection};
use crate::model::QuestionKind;
use crate::render::{flag_or, with_answer_schema};
use crate::results::GradingResult;
use crate::traits::QuestionHandler;
use crate::values::{as_index, deserialize_truthy, parse_or_default, position_id, scalar_text};

#[derive(Debug, Deserialize)]
struct McqDefinition {
    question_text: String,
    options: Vec<McqOption>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    allow_multiple: bool,
}

#[derive(Debug, Deserialize)]
struct McqOption {
    #[serde(default)]
    id: Option<Value>,
    text: String,
    #[serde(deserialize_with = "deserialize_truthy")]
    is_correct: bool,
}

impl McqDefinition {
    fn choices(&self) -> Vec<Choice> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, opt)| Choice {
                id: resolve_id(opt.id.as_ref(), i),
                text: Some(opt.text.clone()),
                is_correct: opt.is_correct,
            })
            .collect()
    }
}

/// The option's own id, or the positional id when absent.
fn resolve_id(id: Option<&Value>, position: usize) -> String {
    id.and_then(scalar_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| position_id(position))
}

fn options_of(definition: &Value) -> &[Value] {
    definition
        .get("options")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub struct McqHandler;

impl QuestionHandler for McqHandler {
    fn kind(&self) -> QuestionKind {
        QuestionKind::Mcq
    }

    fn validate(&self, definition: &Value) -> bool {
        let Ok(def) = McqDefinition::deserialize(definition) else {
            return false;
        };
        if def.question_text.trim().is_empty() || def.options.is_empty() {
            return false;
        }
        let choices = def.choices();
        let unique = choices
            .iter()
            .enumerate()
            .all(|(i, c)| choices[..i].iter().all(|prev| prev.id != c.id));
        unique && choices.iter().any(|c| c.is_correct)
    }

    fn grade(&self, definition: &Value, _answer_schema: &Value, response: &Value) -> GradingResult {
        let Ok(def) = McqDefinition::deserialize(definition) else {
            return GradingResult::invalid_definition(1.0);
        };
        let choices = def.choices();
        let response: Selection = parse_or_default(response);
        let selected = choice::distinct_selection(&response.selected_options);
        let multiple = choice::is_multiple(&choices, def.allow_multiple);

        tracing::debug!(
            options = choices.len(),
            selected = selected.len(),
            multiple,
            "grading mcq"
        );
        choice::grade_selection(&choices, &selected, multiple, "options")
    }

    fn render_for_learner(&self, definition: &Value) -> Value {
        let options: Vec<Value> = options_of(definition)
            .iter()
            .enumerate()
            .map(|(i, opt)| {
                json!({
                    "id": resolve_id(opt.get("id"), i),
                    "text": opt.get("text").and_then(Value::as_str).unwrap_or_default(),
                    "image": opt.get("image").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();

        json!({
            "question_text": definition.get("question_text").cloned().unwrap_or(Value::Null),
            "question_image": definition.get("question_image").cloned().unwrap_or(Value::Null),
            "options": options,
            "allow_multiple": flag_or(definition, "allow_multiple", false),
            "shuffle_options": flag_or(definition, "shuffle_options", false),
        })
    }

    fn render_for_reviewer(&self, definition: &Value, answer_schema: &Value) -> Value {
        let mut view = with_answer_schema(definition, answer_schema);
        if let Some(options) = view.get_mut("options").and_then(Value::as_array_mut) {
            for (i, opt) in options.iter_mut().enumerate() {
                let id = resolve_id(opt.get("id"), i);
                if let Some(map) = opt.as_object_mut() {
                    map.insert("id".into(), Value::String(id));
                }
            }
        }
        view
    }

    fn default_definition(&self) -> Value {
        let options: Vec<Value> = (0..4)
            .map(|i| json!({"id": position_id(i), "text": "", "is_correct": false, "image": null}))
            .collect();
        json!({
            "question_text": "",
            "question_image": null,
            "options": options,
            "allow_multiple": false,
            "shuffle_options": false,
        })
    }

    fn default_answer_schema(&self) -> Value {
        json!({
            "scoring_method": "all_or_nothing",
            "negative_marking": false,
            "negative_mark_value": 0.25,
            "explanation": "",
            "hints": [],
        })
    }

    fn validate_response(&self, response: &Value) -> bool {
        response.get("selected_options").is_some_and(Value::is_array)
    }

    fn normalize_response(&self, definition: &Value, raw: &Value) -> Value {
        match raw {
            Value::Object(_) => raw.clone(),
            Value::Array(ids) => json!({ "selected_options": ids }),
            Value::Null => json!({ "selected_options": [] }),
            scalar => {
                let text = scalar_text(scalar);
                let is_option_id = options_of(definition)
                    .iter()
                    .enumerate()
                    .any(|(i, opt)| text == Some(resolve_id(opt.get("id"), i)));
                match as_index(scalar) {
                    Some(index) if !is_option_id => {
                        json!({ "selected_options": [position_id(index)] })
                    }
                    _ => json!({ "selected_options": [scalar] }),
                }
            }
        }
    }
}
