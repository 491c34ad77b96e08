use serde::Deserialize;

use crate::protocol::ServerMessage;

/// A question as written in a question bank, before selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionTemplate {
    pub question: String,
    pub choices: Vec<String>,
    pub answer: String,
}

impl QuestionTemplate {
    pub fn new(question: &str, choices: &[&str], answer: &str) -> Self {
        Self {
            question: question.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            answer: answer.to_string(),
        }
    }

    /// Checks the entry can be played.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.question.trim().is_empty() {
            return Err("question text is empty");
        }
        if self.choices.len() < 2 {
            return Err("fewer than two choices");
        }
        if !self.choices.iter().any(|c| answers_match(c, &self.answer)) {
            return Err("answer is not one of the choices");
        }
        Ok(())
    }
}

/// A question selected for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 1-based position within the game.
    pub id: u32,
    pub prompt: String,
    /// Choices in presentation order.
    pub choices: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    /// Case-insensitive, ignoring surrounding whitespace in the submission.
    pub fn is_correct(&self, answer: &str) -> bool {
        answers_match(answer, &self.correct_answer)
    }

    pub fn to_message(&self, time_allowed: u64) -> ServerMessage {
        ServerMessage::Question {
            qid: self.id,
            question: self.prompt.clone(),
            choices: self.choices.clone(),
            time_allowed,
        }
    }
}

fn answers_match(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.to_lowercase()
}
