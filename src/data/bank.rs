use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::LoadError;
use crate::models::{Question, QuestionTemplate};

use super::loader::validate_questions;

/// Source of questions for a game.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    templates: Vec<QuestionTemplate>,
}

impl QuestionBank {
    pub fn new(templates: Vec<QuestionTemplate>) -> Result<Self, LoadError> {
        validate_questions(&templates)?;
        Ok(Self { templates })
    }

    /// The bank compiled into the server.
    pub fn builtin() -> Self {
        let templates = vec![
            QuestionTemplate::new("Capital of Kenya?", &["Nairobi", "Mombasa", "Kisumu", "Eldoret"], "Nairobi"),
            QuestionTemplate::new(
                "Who painted the Mona Lisa?",
                &["Van Gogh", "Leonardo da Vinci", "Picasso", "Rembrandt"],
                "Leonardo da Vinci",
            ),
            QuestionTemplate::new("5 + 7 = ?", &["11", "12", "13", "14"], "12"),
            QuestionTemplate::new("Which planet is the Red Planet?", &["Venus", "Earth", "Mars", "Jupiter"], "Mars"),
            QuestionTemplate::new("Largest ocean on Earth?", &["Atlantic", "Indian", "Pacific", "Arctic"], "Pacific"),
            QuestionTemplate::new("What language is this project written in?", &["Java", "C++", "Rust", "Go"], "Rust"),
            QuestionTemplate::new("Which is a web technology?", &["HTML", "Linux", "MySQL", "SSH"], "HTML"),
            QuestionTemplate::new("HTTP default port?", &["21", "22", "80", "443"], "80"),
            QuestionTemplate::new(
                "Which gas do plants breathe in?",
                &["Oxygen", "Carbon Dioxide", "Nitrogen", "Helium"],
                "Carbon Dioxide",
            ),
            QuestionTemplate::new("Symbol for water?", &["CO2", "H2O", "NaCl", "O2"], "H2O"),
        ];
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Pick up to `count` distinct questions in random order, numbered from 1,
    /// each with its choices shuffled.
    pub fn select<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Question> {
        self.templates
            .choose_multiple(rng, count.min(self.templates.len()))
            .zip(1u32..)
            .map(|(template, id)| {
                let mut choices = template.choices.clone();
                choices.shuffle(rng);
                Question {
                    id,
                    prompt: template.question.clone(),
                    choices,
                    correct_answer: template.answer.clone(),
                }
            })
            .collect()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_builtin_bank_is_valid() {
        let bank = QuestionBank::builtin();
        assert_eq!(bank.len(), 10);
        assert!(validate_questions(&bank.templates).is_ok());
    }

    #[test]
    fn test_select_numbers_distinct_questions() {
        let bank = QuestionBank::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let questions = bank.select(5, &mut rng);

        assert_eq!(questions.len(), 5);
        let ids: Vec<u32> = questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let prompts: HashSet<&str> = questions.iter().map(|q| q.prompt.as_str()).collect();
        assert_eq!(prompts.len(), 5);

        for question in &questions {
            let template = bank
                .templates
                .iter()
                .find(|t| t.question == question.prompt)
                .unwrap();
            let mut shuffled = question.choices.clone();
            let mut original = template.choices.clone();
            shuffled.sort();
            original.sort();
            assert_eq!(shuffled, original);
            assert!(question.is_correct(&template.answer));
        }
    }

    #[test]
    fn test_select_is_capped_by_bank_size() {
        let bank = QuestionBank::new(vec![
            QuestionTemplate::new("5 + 7 = ?", &["11", "12", "13", "14"], "12"),
            QuestionTemplate::new("HTTP default port?", &["21", "22", "80", "443"], "80"),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(bank.select(50, &mut rng).len(), 2);
        assert!(bank.select(0, &mut rng).is_empty());
    }

    #[test]
    fn test_new_rejects_empty_bank() {
        assert!(matches!(QuestionBank::new(Vec::new()), Err(LoadError::Empty)));
    }
}
