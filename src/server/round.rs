use std::collections::HashMap;

use tokio::time::Instant;

use crate::models::PlayerId;

/// Answers collected for one question.
#[derive(Debug)]
pub struct Round {
    qid: u32,
    deadline: Instant,
    answers: HashMap<PlayerId, String>,
}

impl Round {
    pub fn new(qid: u32, deadline: Instant) -> Self {
        Self {
            qid,
            deadline,
            answers: HashMap::new(),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Record `player`'s answer for `qid`. Returns false when the answer is
    /// for another question or the player already answered this one.
    pub fn record(&mut self, player: PlayerId, qid: u32, answer: &str) -> bool {
        if qid != self.qid || self.answers.contains_key(&player) {
            return false;
        }
        self.answers.insert(player, answer.trim().to_string());
        true
    }

    /// The recorded answer, empty when the player never answered.
    pub fn answer_of(&self, player: &PlayerId) -> &str {
        self.answers.get(player).map(String::as_str).unwrap_or("")
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    /// True once every player in `expected` has an answer.
    pub fn has_answers_from(&self, expected: &[PlayerId]) -> bool {
        expected.iter().all(|id| self.answers.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::*;

    fn player_id(port: u16) -> PlayerId {
        PlayerId::new(SocketAddr::from(([127, 0, 0, 1], port)))
    }

    #[test]
    fn test_first_answer_wins() {
        let mut round = Round::new(2, Instant::now());
        assert!(round.record(player_id(1), 2, " Mars "));
        assert!(!round.record(player_id(1), 2, "Venus"));
        assert_eq!(round.answer_of(&player_id(1)), "Mars");
        assert_eq!(round.answered(), 1);
    }

    #[test]
    fn test_other_question_ignored() {
        let mut round = Round::new(2, Instant::now());
        assert!(!round.record(player_id(1), 1, "Mars"));
        assert!(!round.record(player_id(1), 3, "Mars"));
        assert_eq!(round.answer_of(&player_id(1)), "");
        assert_eq!(round.answered(), 0);
    }

    #[test]
    fn test_completion() {
        let mut round = Round::new(1, Instant::now());
        let everyone = [player_id(1), player_id(2)];
        assert!(!round.has_answers_from(&everyone));
        round.record(player_id(1), 1, "12");
        assert!(!round.has_answers_from(&everyone));
        round.record(player_id(2), 1, "");
        assert!(round.has_answers_from(&everyone));
        assert!(round.has_answers_from(&[]));
    }
}
