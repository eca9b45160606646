//! One handler per question type.

mod choice;
pub mod cloze;
pub mod comprehension;
pub mod image_grid;
pub mod long_answer;
pub mod matching;
pub mod mcq;
pub mod ordering;
pub mod short_answer;

pub use cloze::ClozeHandler;
pub use comprehension::ComprehensionHandler;
pub use image_grid::ImageGridHandler;
pub use long_answer::LongAnswerHandler;
pub use matching::MatchingHandler;
pub use mcq::McqHandler;
pub use ordering::OrderingHandler;
pub use short_answer::ShortAnswerHandler;
