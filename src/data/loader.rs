use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::models::QuestionTemplate;

/// Load a question bank from a JSON array of `{question, choices, answer}`.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<QuestionTemplate>, LoadError> {
    let path = path.as_ref();

    let json_content =
        fs::read_to_string(path).map_err(|err| LoadError::Read(path.to_path_buf(), err))?;

    let questions: Vec<QuestionTemplate> = serde_json::from_str(&json_content)
        .map_err(|err| LoadError::Parse(path.to_path_buf(), err))?;

    validate_questions(&questions)?;
    Ok(questions)
}

pub fn validate_questions(questions: &[QuestionTemplate]) -> Result<(), LoadError> {
    if questions.is_empty() {
        return Err(LoadError::Empty);
    }

    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|reason| LoadError::Invalid { index, reason })?;
    }

    Ok(())
}
