//! Dispatch from type keys to handlers, plus per-type metadata.
//!
//! The set of types is fixed at build time. Handlers are stateless unit
//! structs, so lookups hand out `&'static` references.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::GradingError;
use crate::handlers::{
    ClozeHandler, ComprehensionHandler, ImageGridHandler, LongAnswerHandler, MatchingHandler,
    McqHandler, OrderingHandler, ShortAnswerHandler,
};
use crate::model::QuestionKind;
use crate::traits::QuestionHandler;

/// Broad grouping used by authoring tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Basic,
    Open,
    Interactive,
    Visual,
    Complex,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Basic => "basic",
            Category::Open => "open",
            Category::Interactive => "interactive",
            Category::Visual => "visual",
            Category::Complex => "complex",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How responses of a type are normally graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingMode {
    Automatic,
    AiAssisted,
    Manual,
}

impl fmt::Display for GradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GradingMode::Automatic => "automatic",
            GradingMode::AiAssisted => "ai_assisted",
            GradingMode::Manual => "manual",
        })
    }
}

/// Descriptive metadata for a question type.
#[derive(Debug, Clone, Serialize)]
pub struct TypeInfo {
    pub key: QuestionKind,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub supports_images: bool,
    pub grading: GradingMode,
    pub example: &'static str,
}

/// The handler registered for `kind`.
pub fn handler_of(kind: QuestionKind) -> &'static dyn QuestionHandler {
    match kind {
        QuestionKind::Mcq => &McqHandler,
        QuestionKind::Cloze => &ClozeHandler,
        QuestionKind::Matching => &MatchingHandler,
        QuestionKind::Ordering => &OrderingHandler,
        QuestionKind::ImageGridMcq => &ImageGridHandler,
        QuestionKind::ShortAnswer => &ShortAnswerHandler,
        QuestionKind::LongAnswer => &LongAnswerHandler,
        QuestionKind::Comprehension => &ComprehensionHandler,
    }
}

/// Look up a handler by type key. Unknown keys yield `None`, never a
/// fallback handler.
pub fn get_handler(key: &str) -> Option<&'static dyn QuestionHandler> {
    key.parse::<QuestionKind>().ok().map(handler_of)
}

/// Like [`get_handler`] but reports a miss as an error.
pub fn handler_for(key: &str) -> Result<&'static dyn QuestionHandler, GradingError> {
    key.parse::<QuestionKind>().map(handler_of)
}

pub fn is_valid_type(key: &str) -> bool {
    get_handler(key).is_some()
}

/// All registered kinds, in registry order.
pub fn all_kinds() -> &'static [QuestionKind] {
    &QuestionKind::ALL
}

pub fn type_info(kind: QuestionKind) -> TypeInfo {
    let (name, description, category, supports_images, grading, example) = match kind {
        QuestionKind::Mcq => (
            "Multiple Choice Question",
            "Traditional multiple choice with single or multiple correct answers",
            Category::Basic,
            true,
            GradingMode::Automatic,
            "What is the capital of France? A) London B) Paris C) Berlin",
        ),
        QuestionKind::Cloze => (
            "Cloze/Gap Fill",
            "Fill in the blanks in a passage of text",
            Category::Basic,
            false,
            GradingMode::Automatic,
            "The capital of France is {blank} and it has a population of {blank}.",
        ),
        QuestionKind::ShortAnswer => (
            "Short Answer",
            "Open-ended short text response requiring AI or manual grading",
            Category::Open,
            true,
            GradingMode::AiAssisted,
            "Explain the process of photosynthesis in 2-3 sentences.",
        ),
        QuestionKind::LongAnswer => (
            "Long Answer/Essay",
            "Extended essay responses with rich text formatting (no word limit)",
            Category::Open,
            true,
            GradingMode::Manual,
            "Analyze the causes and effects of climate change in essay format.",
        ),
        QuestionKind::Ordering => (
            "Ordering/Sequencing",
            "Arrange items in the correct order",
            Category::Interactive,
            true,
            GradingMode::Automatic,
            "Arrange the steps of the water cycle in order.",
        ),
        QuestionKind::Matching => (
            "Matching",
            "Match terms with their definitions or pairs",
            Category::Interactive,
            true,
            GradingMode::Automatic,
            "Match each country with its capital city.",
        ),
        QuestionKind::ImageGridMcq => (
            "Image Grid MCQ",
            "Multiple choice using images instead of text options",
            Category::Visual,
            true,
            GradingMode::Automatic,
            "Select all images that show mammals.",
        ),
        QuestionKind::Comprehension => (
            "Reading Comprehension",
            "Passage-based questions with multiple sub-questions",
            Category::Complex,
            true,
            GradingMode::Automatic,
            "Read the passage about ancient civilizations and answer the questions.",
        ),
    };
    TypeInfo {
        key: kind,
        name,
        description,
        category,
        supports_images,
        grading,
        example,
    }
}

pub fn kinds_by_category(category: Category) -> Vec<QuestionKind> {
    QuestionKind::ALL
        .into_iter()
        .filter(|kind| type_info(*kind).category == category)
        .collect()
}

/// Empty definition template for `key`, `None` for unknown keys.
pub fn default_definition(key: &str) -> Option<Value> {
    get_handler(key).map(|h| h.default_definition())
}

/// Default answer schema for `key`, `None` for unknown keys.
pub fn default_answer_schema(key: &str) -> Option<Value> {
    get_handler(key).map(|h| h.default_answer_schema())
}
