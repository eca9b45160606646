//! Core data model types for quizgrade.
//!
//! Question definitions and answer schemas are free-form JSON-compatible
//! payloads; their shape is owned by the handler for each [`QuestionKind`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::GradingError;

/// The closed set of question types the registry dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    Cloze,
    Matching,
    Ordering,
    ImageGridMcq,
    ShortAnswer,
    LongAnswer,
    Comprehension,
}

impl QuestionKind {
    /// Every kind, in registry order.
    pub const ALL: [QuestionKind; 8] = [
        QuestionKind::Mcq,
        QuestionKind::Cloze,
        QuestionKind::ShortAnswer,
        QuestionKind::LongAnswer,
        QuestionKind::Ordering,
        QuestionKind::Matching,
        QuestionKind::ImageGridMcq,
        QuestionKind::Comprehension,
    ];

    /// The type key as stored alongside a question.
    pub fn key(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Cloze => "cloze",
            QuestionKind::Matching => "matching",
            QuestionKind::Ordering => "ordering",
            QuestionKind::ImageGridMcq => "image_grid_mcq",
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::LongAnswer => "long_answer",
            QuestionKind::Comprehension => "comprehension",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for QuestionKind {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionKind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| GradingError::UnsupportedType(s.to_string()))
    }
}

/// A stored question: type key, opaque definition, opaque answer schema and
/// the marks it is worth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Identifier, unique within a question bank.
    pub id: String,
    /// Optional human-readable title.
    #[serde(default)]
    pub title: String,
    /// Raw type key. Kept as a string so unknown keys survive loading and
    /// can be reported as unsupported.
    #[serde(rename = "type")]
    pub question_type: String,
    /// Type-specific definition payload.
    #[serde(default = "empty_object")]
    pub definition: Value,
    /// Type-specific grading policy.
    #[serde(default = "empty_object")]
    pub answer_schema: Value,
    /// Marks awarded for a fully correct response.
    #[serde(default = "default_marks")]
    pub marks: f64,
}

impl QuestionDefinition {
    pub fn new(id: impl Into<String>, kind: QuestionKind, definition: Value) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            question_type: kind.key().to_string(),
            definition,
            answer_schema: empty_object(),
            marks: default_marks(),
        }
    }

    pub fn with_answer_schema(mut self, answer_schema: Value) -> Self {
        self.answer_schema = answer_schema;
        self
    }

    pub fn with_marks(mut self, marks: f64) -> Self {
        self.marks = marks;
        self
    }

    /// Resolve the type key into a known kind.
    pub fn kind(&self) -> Result<QuestionKind, GradingError> {
        self.question_type.parse()
    }
}

/// A collection of questions loaded from one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this bank.
    #[serde(default)]
    pub description: String,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
}

impl QuestionBank {
    pub fn find(&self, question_id: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Sum of marks over every question in the bank.
    pub fn total_marks(&self) -> f64 {
        self.questions.iter().map(|q| q.marks).sum()
    }
}

pub(crate) fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn default_marks() -> f64 {
    1.0
}
