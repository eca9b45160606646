//! quizgrade-core: question type registry, handlers and grading engine.
//!
//! Each question type is a [`traits::QuestionHandler`] looked up through the
//! [`registry`]. The [`engine`] wraps handlers with definition and response
//! checks and scales raw scores onto question marks.

pub mod engine;
pub mod error;
pub mod handlers;
pub mod model;
pub mod parser;
pub mod registry;
pub mod render;
pub mod report;
pub mod results;
pub mod similarity;
pub mod statistics;
pub mod traits;
pub mod values;
