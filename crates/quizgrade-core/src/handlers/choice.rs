//! Selection scoring shared by the text and image choice handlers.
//!
//! Single-select scores 0 or 1. Multi-select awards +1 per correct selection
//! and -0.5 per wrong one, floored at zero, out of the number of correct
//! choices.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::results::GradingResult;
use crate::values::scalar_text;

/// Penalty applied per wrong selection in multi-select mode.
pub const WRONG_SELECTION_PENALTY: f64 = 0.5;

/// A choice with its identity already resolved.
#[derive(Debug, Clone)]
pub struct Choice {
    pub id: String,
    pub text: Option<String>,
    pub is_correct: bool,
}

/// Response container for choice types: a list of selected ids.
#[derive(Debug, Default, Deserialize)]
pub struct Selection {
    #[serde(default, alias = "selected_images")]
    pub selected_options: Vec<Value>,
}

/// Selected ids as text, deduplicated, first occurrence wins.
pub fn distinct_selection(raw: &[Value]) -> Vec<String> {
    let mut seen = Vec::new();
    for id in raw.iter().filter_map(scalar_text) {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

/// Whether the choice set should be graded as multi-select.
pub fn is_multiple(choices: &[Choice], allow_multiple: bool) -> bool {
    allow_multiple || choices.iter().filter(|c| c.is_correct).count() > 1
}

/// Grade `selected` against `choices`. `noun` names the choices in feedback
/// ("options", "images").
pub fn grade_selection(
    choices: &[Choice],
    selected: &[String],
    multiple: bool,
    noun: &str,
) -> GradingResult {
    let correct: Vec<&str> = choices
        .iter()
        .filter(|c| c.is_correct)
        .map(|c| c.id.as_str())
        .collect();

    if multiple {
        grade_multiple(&correct, selected, noun)
    } else {
        grade_single(choices, &correct, selected, noun)
    }
}

fn grade_multiple(correct: &[&str], selected: &[String], noun: &str) -> GradingResult {
    let (correct_selected, incorrect_selected): (Vec<&String>, Vec<&String>) =
        selected.iter().partition(|id| correct.contains(&id.as_str()));
    let missed_correct: Vec<&str> = correct
        .iter()
        .copied()
        .filter(|id| !selected.iter().any(|s| s == id))
        .collect();

    let total_correct = correct.len() as f64;
    let score = (correct_selected.len() as f64
        - incorrect_selected.len() as f64 * WRONG_SELECTION_PENALTY)
        .max(0.0);
    let is_correct = score == total_correct && incorrect_selected.is_empty();

    let feedback = if is_correct {
        format!("Perfect! All correct {noun} selected.")
    } else {
        let mut parts = Vec::new();
        if !correct_selected.is_empty() {
            parts.push(format!("Correctly selected: {}.", join(&correct_selected)));
        }
        if !incorrect_selected.is_empty() {
            parts.push(format!("Incorrectly selected: {}.", join(&incorrect_selected)));
        }
        if !missed_correct.is_empty() {
            parts.push(format!("Missed correct {noun}: {}.", missed_correct.join(", ")));
        }
        if parts.is_empty() {
            parts.push(format!("No {noun} selected."));
        }
        parts.join(" ")
    };

    GradingResult::new(score, total_correct, is_correct, feedback).with_details(json!({
        "correct_selected": correct_selected,
        "incorrect_selected": incorrect_selected,
        "missed_correct": missed_correct,
        "total_correct": correct.len(),
    }))
}

fn grade_single(
    choices: &[Choice],
    correct: &[&str],
    selected: &[String],
    noun: &str,
) -> GradingResult {
    let text_of = |id: &str| {
        choices
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.text.clone())
    };
    let correct_answer = correct.first().copied();

    let (is_correct, feedback) = match selected {
        [] => (false, "No answer selected.".to_string()),
        [only] if correct.contains(&only.as_str()) => (true, "Correct answer!".to_string()),
        [_] => (false, "Incorrect answer.".to_string()),
        _ => (false, format!("Only one of the {noun} may be selected.")),
    };
    let score = if is_correct { 1.0 } else { 0.0 };
    let first = selected.first();

    GradingResult::new(score, 1.0, is_correct, feedback).with_details(json!({
        "selected": first,
        "selected_text": first.and_then(|id| text_of(id)),
        "correct_answer": correct_answer,
        "correct_answer_text": correct_answer.and_then(text_of),
    }))
}

fn join(ids: &[&String]) -> String {
    ids.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}
