//! Text rendering of server messages.

use crate::protocol::ServerMessage;

/// Turn a server message into the lines shown to the player.
pub fn render(msg: &ServerMessage) -> String {
    match msg {
        ServerMessage::Ready { text } => format!("\n[SERVER] {}", text),
        ServerMessage::Question {
            qid,
            question,
            choices,
            ..
        } => {
            let mut out = format!("\nQ{}: {}", qid, question);
            for (i, choice) in choices.iter().enumerate() {
                out.push_str(&format!("\n  {}. {}", i + 1, choice));
            }
            out
        }
        ServerMessage::Result {
            correct: true,
            answer,
            score,
            ..
        } => format!("Correct! You answered: {}. Score: {}", answer, score),
        ServerMessage::Result {
            answer,
            correct_answer,
            score,
            ..
        } => format!(
            "Wrong. You answered: '{}'. Correct: '{}'. Score: {}",
            answer, correct_answer, score
        ),
        ServerMessage::Leaderboard { players } => {
            let mut out = String::from("\nLeaderboard:");
            for (i, entry) in players.iter().enumerate() {
                out.push_str(&format!("\n  {}. {} - {} pts", i + 1, entry.username, entry.score));
            }
            out
        }
        ServerMessage::Finished { text } => format!("\n{}", text),
    }
}

/// Map what the player typed to an answer: a number in `1..=choices` picks
/// that choice, anything else is sent as typed.
pub fn resolve_choice(input: &str, choices: &[String]) -> String {
    let input = input.trim();
    match input.parse::<usize>() {
        Ok(n) if (1..=choices.len()).contains(&n) => choices[n - 1].clone(),
        _ => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::LeaderboardEntry;

    fn choices() -> Vec<String> {
        vec!["11".into(), "12".into(), "13".into(), "14".into()]
    }

    #[test]
    fn test_resolve_choice() {
        assert_eq!(resolve_choice("2", &choices()), "12");
        assert_eq!(resolve_choice(" 4 ", &choices()), "14");
        assert_eq!(resolve_choice("5", &choices()), "5");
        assert_eq!(resolve_choice("0", &choices()), "0");
        assert_eq!(resolve_choice("twelve", &choices()), "twelve");
        assert_eq!(resolve_choice("", &choices()), "");
    }

    #[test]
    fn test_render_question_and_board() {
        let question = ServerMessage::Question {
            qid: 1,
            question: "5 + 7 = ?".into(),
            choices: choices(),
            time_allowed: 15,
        };
        let text = render(&question);
        assert!(text.contains("Q1: 5 + 7 = ?"));
        assert!(text.contains("2. 12"));

        let board = ServerMessage::Leaderboard {
            players: vec![LeaderboardEntry::new("A", 1), LeaderboardEntry::new("B", 0)],
        };
        let text = render(&board);
        assert!(text.contains("1. A - 1 pts"));
        assert!(text.contains("2. B - 0 pts"));
    }

    #[test]
    fn test_render_results() {
        let right = ServerMessage::Result {
            correct: true,
            answer: "12".into(),
            correct_answer: "12".into(),
            score: 1,
        };
        assert!(render(&right).starts_with("Correct!"));

        let wrong = ServerMessage::Result {
            correct: false,
            answer: String::new(),
            correct_answer: "12".into(),
            score: 0,
        };
        assert!(render(&wrong).contains("Correct: '12'"));
    }
}
