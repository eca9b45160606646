//! The capability set every question type implements.

use serde_json::Value;

use crate::model::{empty_object, QuestionKind};
use crate::results::GradingResult;

/// Per-type implementation of validation, grading, rendering and defaults.
///
/// Handlers are stateless: every method is a pure function of its inputs,
/// so a handler can be shared freely across threads.
pub trait QuestionHandler: Send + Sync {
    /// The type this handler is registered under.
    fn kind(&self) -> QuestionKind;

    /// Structural check of an authored definition. Never mutates input.
    fn validate(&self, definition: &Value) -> bool;

    /// Grade a response. Malformed-but-parsable input yields a zero score
    /// with explanatory feedback rather than an error.
    fn grade(&self, definition: &Value, answer_schema: &Value, response: &Value) -> GradingResult;

    /// View safe to show a learner: nothing that reveals the answer.
    fn render_for_learner(&self, definition: &Value) -> Value;

    /// Unredacted view for reviewers and authors.
    fn render_for_reviewer(&self, definition: &Value, answer_schema: &Value) -> Value;

    /// Empty template used by authoring tools.
    fn default_definition(&self) -> Value;

    /// Default grading policy used by authoring tools.
    fn default_answer_schema(&self) -> Value;

    /// Shape check of a response, independent of correctness.
    fn validate_response(&self, response: &Value) -> bool;

    /// Coerce a bare scalar or list into this handler's response container.
    ///
    /// Objects are assumed to already be in container shape.
    fn normalize_response(&self, _definition: &Value, raw: &Value) -> Value {
        match raw {
            Value::Object(_) => raw.clone(),
            _ => empty_object(),
        }
    }
}
