//! Grading error types.
//!
//! These errors are surfaced by the checked grading façade in
//! [`crate::engine`]. Handlers themselves never fail: a well-formed but wrong
//! response is a low score, not an error.

use thiserror::Error;

use crate::model::QuestionKind;

/// Errors that can occur when routing a question through the engine.
#[derive(Debug, Error)]
pub enum GradingError {
    /// No handler is registered for the type key.
    #[error("unsupported question type: {0}")]
    UnsupportedType(String),

    /// The stored definition does not pass the handler's `validate` check.
    #[error("invalid {kind} definition for question {question}")]
    InvalidDefinition { question: String, kind: QuestionKind },

    /// The response payload does not have the shape the handler expects.
    #[error("invalid {kind} response shape for question {question}")]
    InvalidResponse { question: String, kind: QuestionKind },

    /// The submission carried no response for the question.
    #[error("missing response for question {0}")]
    MissingResponse(String),
}

impl GradingError {
    /// Returns `true` if the problem lies with the authored question rather
    /// than with the learner's submission.
    pub fn is_authoring_error(&self) -> bool {
        matches!(
            self,
            GradingError::UnsupportedType(_) | GradingError::InvalidDefinition { .. }
        )
    }

    /// Short machine-readable label, used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            GradingError::UnsupportedType(_) => "unsupported_type",
            GradingError::InvalidDefinition { .. } => "invalid_definition",
            GradingError::InvalidResponse { .. } => "invalid_response",
            GradingError::MissingResponse(_) => "missing_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authoring_errors_are_classified() {
        assert!(GradingError::UnsupportedType("essay".into()).is_authoring_error());
        assert!(GradingError::InvalidDefinition {
            question: "q1".into(),
            kind: QuestionKind::Mcq,
        }
        .is_authoring_error());
        assert!(!GradingError::MissingResponse("q1".into()).is_authoring_error());
    }

    #[test]
    fn display_names_the_type_key() {
        let err = GradingError::InvalidResponse {
            question: "q7".into(),
            kind: QuestionKind::Cloze,
        };
        assert_eq!(err.to_string(), "invalid cloze response shape for question q7");
        assert_eq!(err.code(), "invalid_response");
    }
}
