//! Question sources.

mod bank;
mod loader;

pub use bank::QuestionBank;
pub use loader::load_questions_from_json;
