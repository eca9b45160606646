//! Fill-in-the-blank questions.
//!
//! Each blank is scored on its own: an exact match earns 1, and when the
//! blank accepts partial answers a close miss earns 0.5 or 0.3 depending on
//! character similarity to the nearest accepted answer.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::model::QuestionKind;
use crate::render::{str_or, with_answer_schema};
use crate::results::GradingResult;
use crate::similarity::similarity_percent;
use crate::traits::QuestionHandler;
use crate::values::{deserialize_opt_truthy, deserialize_truthy, scalar_text};

/// Similarity (percent) at or above which a blank earns [`HIGH_PARTIAL_CREDIT`].
pub const HIGH_SIMILARITY: f64 = 70.0;
/// Similarity (percent) at or above which a blank earns [`LOW_PARTIAL_CREDIT`].
pub const LOW_SIMILARITY: f64 = 50.0;
pub const HIGH_PARTIAL_CREDIT: f64 = 0.5;
pub const LOW_PARTIAL_CREDIT: f64 = 0.3;

const DEFAULT_INSTRUCTIONS: &str = "Fill in the blanks with appropriate words.";
const DEFAULT_MAX_LENGTH: u64 = 50;

#[derive(Debug, Deserialize)]
struct ClozeDefinition {
    passage: String,
    blanks: Vec<Blank>,
}

#[derive(Debug, Deserialize)]
struct Blank {
    id: String,
    correct_answers: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_opt_truthy")]
    case_sensitive: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    accept_partial: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ClozeSchema {
    #[serde(default, deserialize_with = "deserialize_truthy")]
    case_sensitive_default: bool,
}

/// Credit for one blank.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlankCredit {
    exact: bool,
    credit: f64,
}

/// Score `answer` against every accepted answer and keep the best credit.
fn score_blank(
    answer: &str,
    accepted: &[String],
    case_sensitive: bool,
    accept_partial: bool,
) -> BlankCredit {
    let miss = BlankCredit {
        exact: false,
        credit: 0.0,
    };
    if answer.is_empty() {
        return miss;
    }
    let normalize = |s: &str| {
        if case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    };
    let answer = normalize(answer);

    let mut best = miss;
    for candidate in accepted.iter().map(|c| normalize(c.trim())) {
        if answer == candidate {
            return BlankCredit {
                exact: true,
                credit: 1.0,
            };
        }
        if accept_partial {
            let credit = partial_credit(similarity_percent(&answer, &candidate));
            if credit > best.credit {
                best.credit = credit;
            }
        }
    }
    best
}

fn partial_credit(similarity: f64) -> f64 {
    if similarity >= HIGH_SIMILARITY {
        HIGH_PARTIAL_CREDIT
    } else if similarity >= LOW_SIMILARITY {
        LOW_PARTIAL_CREDIT
    } else {
        0.0
    }
}

/// Create one default blank per `{id}` placeholder in `passage`.
pub fn extract_blanks_from_passage(passage: &str) -> Vec<Value> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("static regex"));
    re.captures_iter(passage)
        .map(|cap| {
            json!({
                "id": &cap[1],
                "correct_answers": [""],
                "case_sensitive": false,
                "accept_partial": false,
                "placeholder": "",
                "max_length": DEFAULT_MAX_LENGTH,
            })
        })
        .collect()
}

pub struct ClozeHandler;

impl QuestionHandler for ClozeHandler {
    fn kind(&self) -> QuestionKind {
        QuestionKind::Cloze
    }

    fn validate(&self, definition: &Value) -> bool {
        let Ok(def) = ClozeDefinition::deserialize(definition) else {
            return false;
        };
        if def.passage.trim().is_empty() || def.blanks.is_empty() {
            return false;
        }
        def.blanks.iter().enumerate().all(|(i, blank)| {
            !blank.id.is_empty()
                && !blank.correct_answers.is_empty()
                && def.blanks[..i].iter().all(|prev| prev.id != blank.id)
        })
    }

    fn grade(&self, definition: &Value, answer_schema: &Value, response: &Value) -> GradingResult {
        let Ok(def) = ClozeDefinition::deserialize(definition) else {
            return GradingResult::invalid_definition(0.0);
        };
        let schema: ClozeSchema = crate::values::parse_or_default(answer_schema);
        let answers = response.get("answers").and_then(Value::as_object);

        let mut feedback = Vec::with_capacity(def.blanks.len());
        let mut per_blank = Map::new();
        let mut total = 0.0;
        let mut exact_count = 0usize;
        let mut partial_count = 0usize;

        for blank in &def.blanks {
            let answer = answers
                .and_then(|a| a.get(&blank.id))
                .and_then(scalar_text)
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let case_sensitive = blank.case_sensitive.unwrap_or(schema.case_sensitive_default);
            let outcome = score_blank(
                &answer,
                &blank.correct_answers,
                case_sensitive,
                blank.accept_partial,
            );

            total += outcome.credit;
            let verdict = if outcome.exact {
                exact_count += 1;
                "Correct"
            } else if outcome.credit > 0.0 {
                partial_count += 1;
                "Partially correct"
            } else {
                "Incorrect"
            };
            feedback.push(format!("Blank {}: {verdict}", blank.id));
            per_blank.insert(
                blank.id.clone(),
                json!({
                    "student_answer": answer,
                    "correct_answers": blank.correct_answers,
                    "is_correct": outcome.exact,
                    "partial_credit": outcome.credit,
                }),
            );
        }

        let total_blanks = def.blanks.len();
        let details = json!({
            "blanks": per_blank,
            "summary": {
                "correct_blanks": exact_count,
                "total_blanks": total_blanks,
                "partial_credit_blanks": partial_count,
            },
        });

        GradingResult::new(
            total,
            total_blanks as f64,
            exact_count == total_blanks,
            feedback.join("; "),
        )
        .with_details(details)
    }

    fn render_for_learner(&self, definition: &Value) -> Value {
        let blanks: Vec<Value> = definition
            .get("blanks")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|blank| {
                json!({
                    "id": blank.get("id").cloned().unwrap_or(Value::Null),
                    "placeholder": str_or(blank, "placeholder", ""),
                    "max_length": blank
                        .get("max_length")
                        .and_then(Value::as_u64)
                        .unwrap_or(DEFAULT_MAX_LENGTH),
                })
            })
            .collect();

        json!({
            "passage": definition.get("passage").cloned().unwrap_or(Value::Null),
            "blanks": blanks,
            "instructions": str_or(definition, "instructions", DEFAULT_INSTRUCTIONS),
        })
    }

    fn render_for_reviewer(&self, definition: &Value, answer_schema: &Value) -> Value {
        with_answer_schema(definition, answer_schema)
    }

    fn default_definition(&self) -> Value {
        json!({
            "passage": "",
            "blanks": [],
            "instructions": DEFAULT_INSTRUCTIONS,
        })
    }

    fn default_answer_schema(&self) -> Value {
        json!({
            "partial_credit_enabled": true,
            "partial_credit_threshold": LOW_SIMILARITY,
            "case_sensitive_default": false,
            "allow_synonyms": false,
            "synonym_list": [],
        })
    }

    fn validate_response(&self, response: &Value) -> bool {
        response.get("answers").is_some_and(Value::is_object)
    }

    fn normalize_response(&self, definition: &Value, raw: &Value) -> Value {
        match raw {
            Value::Object(map) if map.contains_key("answers") => raw.clone(),
            Value::Object(_) => json!({ "answers": raw }),
            Value::Null | Value::Array(_) => json!({ "answers": {} }),
            scalar => {
                let first_blank = definition
                    .get("blanks")
                    .and_then(|b| b.get(0))
                    .and_then(|b| b.get("id"))
                    .and_then(Value::as_str);
                match first_blank {
                    Some(id) => json!({ "answers": { id: scalar } }),
                    None => json!({ "answers": {} }),
                }
            }
        }
    }
}
