//! Multiple choice over a grid of images.
//!
//! Scoring is the same selection scoring as text multiple choice; only the
//! option payloads and the response key (`selected_images`) differ.

use serde::Deserialize;
use serde_json::{json, Value};

use super::choice::{self, Choice, Selection};
use crate::model::QuestionKind;
use crate::render::{flag_or, seeded_shuffle, str_or, with_answer_schema};
use crate::results::GradingResult;
use crate::traits::QuestionHandler;
use crate::values::{as_index, deserialize_truthy, is_truthy, parse_or_default, scalar_text};

const DEFAULT_INSTRUCTIONS: &str = "Select the correct image(s).";
const DEFAULT_GRID_COLUMNS: u64 = 3;
const PLACEHOLDER_PREFIXES: [&str; 2] = ["placeholder_", "pending_upload_"];

#[derive(Debug, Deserialize)]
struct ImageGridDefinition {
    question_text: String,
    images: Vec<ImageOption>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    allow_multiple: bool,
}

#[derive(Debug, Deserialize)]
struct ImageOption {
    id: Value,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image_file: Option<String>,
    #[serde(default)]
    pending_upload: Option<Value>,
    #[serde(default)]
    alt: Option<String>,
    #[serde(deserialize_with = "deserialize_truthy")]
    is_correct: bool,
}

impl ImageOption {
    fn id(&self) -> Option<String> {
        scalar_text(&self.id).filter(|s| !s.is_empty())
    }

    /// A displayable reference, or an explicit pending-upload marker.
    fn is_displayable(&self) -> bool {
        let present = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.url)
            || present(&self.image_file)
            || self.pending_upload.as_ref().is_some_and(is_truthy)
    }
}

impl ImageGridDefinition {
    fn choices(&self) -> Vec<Choice> {
        self.images
            .iter()
            .map(|img| Choice {
                id: img.id().unwrap_or_default(),
                text: img.alt.clone(),
                is_correct: img.is_correct,
            })
            .collect()
    }
}

/// URL a learner's browser can load: `image_file` wins over `url`, and
/// placeholder urls are never shown.
fn display_url(image: &Value) -> String {
    let image_file = image.get("image_file").and_then(Value::as_str);
    let url = image_file
        .or_else(|| image.get("url").and_then(Value::as_str))
        .unwrap_or_default();
    if PLACEHOLDER_PREFIXES.iter().any(|p| url.starts_with(p)) {
        image_file.unwrap_or_default().to_string()
    } else {
        url.to_string()
    }
}

pub struct ImageGridHandler;

impl QuestionHandler for ImageGridHandler {
    fn kind(&self) -> QuestionKind {
        QuestionKind::ImageGridMcq
    }

    fn validate(&self, definition: &Value) -> bool {
        let Ok(def) = ImageGridDefinition::deserialize(definition) else {
            return false;
        };
        if def.question_text.trim().is_empty() || def.images.is_empty() {
            return false;
        }
        let ids: Vec<Option<String>> = def.images.iter().map(ImageOption::id).collect();
        let ids_ok = ids
            .iter()
            .enumerate()
            .all(|(i, id)| id.is_some() && !ids[..i].contains(id));
        ids_ok
            && def.images.iter().all(ImageOption::is_displayable)
            && def.images.iter().any(|img| img.is_correct)
    }

    fn grade(&self, definition: &Value, _answer_schema: &Value, response: &Value) -> GradingResult {
        let Ok(def) = ImageGridDefinition::deserialize(definition) else {
            return GradingResult::invalid_definition(1.0);
        };
        let choices = def.choices();
        let response: Selection = parse_or_default(response);
        let selected = choice::distinct_selection(&response.selected_options);
        let multiple = choice::is_multiple(&choices, def.allow_multiple);

        choice::grade_selection(&choices, &selected, multiple, "images")
    }

    fn render_for_learner(&self, definition: &Value) -> Value {
        let mut images: Vec<Value> = definition
            .get("images")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|image| {
                json!({
                    "id": image.get("id").cloned().unwrap_or(Value::Null),
                    "url": display_url(image),
                    "image_file": image.get("image_file").cloned().unwrap_or(Value::Null),
                    "alt": str_or(image, "alt", ""),
                    "description": str_or(image, "description", ""),
                })
            })
            .collect();
        if flag_or(definition, "shuffle_images", false) {
            seeded_shuffle(&mut images, definition);
        }

        json!({
            "question_text": definition.get("question_text").cloned().unwrap_or(Value::Null),
            "images": images,
            "allow_multiple": flag_or(definition, "allow_multiple", false),
            "grid_columns": definition
                .get("grid_columns")
                .and_then(Value::as_u64)
                .unwrap_or(DEFAULT_GRID_COLUMNS),
            "instructions": str_or(definition, "instructions", DEFAULT_INSTRUCTIONS),
        })
    }

    fn render_for_reviewer(&self, definition: &Value, answer_schema: &Value) -> Value {
        with_answer_schema(definition, answer_schema)
    }

    fn default_definition(&self) -> Value {
        json!({
            "question_text": "",
            "images": [],
            "allow_multiple": false,
            "shuffle_images": false,
            "grid_columns": DEFAULT_GRID_COLUMNS,
            "instructions": DEFAULT_INSTRUCTIONS,
        })
    }

    fn default_answer_schema(&self) -> Value {
        json!({
            "partial_credit": true,
            "negative_marking": true,
            "negative_mark_value": choice::WRONG_SELECTION_PENALTY,
        })
    }

    fn validate_response(&self, response: &Value) -> bool {
        response.get("selected_images").is_some_and(Value::is_array)
    }

    fn normalize_response(&self, definition: &Value, raw: &Value) -> Value {
        let images = definition
            .get("images")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        match raw {
            Value::Object(_) => raw.clone(),
            Value::Array(ids) => json!({ "selected_images": ids }),
            Value::Null => json!({ "selected_images": [] }),
            scalar => {
                // An exact id match wins over reading the value as a position.
                let text = scalar_text(scalar);
                let by_id = images
                    .iter()
                    .filter_map(|image| image.get("id"))
                    .find(|id| text.is_some() && scalar_text(id) == text);
                let by_index = || {
                    as_index(scalar)
                        .and_then(|index| images.get(index))
                        .and_then(|image| image.get("id"))
                };
                match by_id.or_else(by_index) {
                    Some(id) => json!({ "selected_images": [id] }),
                    None => json!({ "selected_images": [scalar] }),
                }
            }
        }
    }
}
