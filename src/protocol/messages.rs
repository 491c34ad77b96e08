//! Protocol messages for client-server communication.
//!
//! All messages are serialized as one JSON object per line, tagged by
//! `message_type`.

use serde::{Deserialize, Serialize};

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "UPPERCASE")]
pub enum ClientMessage {
    /// Handshake, the first frame of every connection.
    Hi {
        #[serde(default)]
        username: Option<String>,
    },

    /// Client submits an answer for a question.
    Answer {
        qid: u32,
        #[serde(default)]
        answer: String,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "UPPERCASE")]
pub enum ServerMessage {
    /// Informational notice (welcome, game starting).
    Ready { text: String },

    /// Next question to answer.
    Question {
        qid: u32,
        question: String,
        choices: Vec<String>,
        time_allowed: u64,
    },

    /// Outcome of the last question for one player.
    Result {
        correct: bool,
        answer: String,
        correct_answer: String,
        score: u32,
    },

    /// Standings, highest score first.
    Leaderboard { players: Vec<LeaderboardEntry> },

    /// Game over.
    Finished { text: String },
}

impl ServerMessage {
    pub fn ready(text: impl Into<String>) -> Self {
        Self::Ready { text: text.into() }
    }

    pub fn finished() -> Self {
        Self::Finished {
            text: FINISHED_TEXT.to_string(),
        }
    }
}

/// Entry in the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(username: impl Into<String>, score: u32) -> Self {
        Self {
            username: username.into(),
            score,
        }
    }
}

pub const GAME_STARTING_TEXT: &str = "Game starting now! Get ready.";
pub const FINISHED_TEXT: &str = "Game over. Thanks for playing!";

/// Default server port.
pub const DEFAULT_PORT: u16 = 10000;

/// Text of the READY frame sent right after a successful handshake.
pub fn welcome_text(username: &str) -> String {
    format!("Welcome {}, wait for game to start...", username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let msg = ClientMessage::Hi {
            username: Some("Alice".to_string()),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"message_type\":\"HI\""));
        assert!(json.contains("\"username\":\"Alice\""));

        let msg = ServerMessage::Question {
            qid: 3,
            question: "5 + 7 = ?".to_string(),
            choices: vec!["11".into(), "12".into()],
            time_allowed: 15,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"message_type\":\"QUESTION\""));
        assert!(json.contains("\"time_allowed\":15"));
    }

    #[test]
    fn test_result_and_leaderboard_fields() {
        let msg = ServerMessage::Result {
            correct: true,
            answer: "12".into(),
            correct_answer: "12".into(),
            score: 1,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["message_type"], "RESULT");
        assert_eq!(value["correct_answer"], "12");
        assert_eq!(value["score"], 1);

        let msg = ServerMessage::Leaderboard {
            players: vec![LeaderboardEntry::new("A", 1), LeaderboardEntry::new("B", 0)],
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["message_type"], "LEADERBOARD");
        assert_eq!(value["players"][0]["username"], "A");
        assert_eq!(value["players"][1]["score"], 0);
    }

    #[test]
    fn test_client_message_decoding() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"message_type":"ANSWER","qid":2,"answer":"Mars"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Answer {
                qid: 2,
                answer: "Mars".into()
            }
        );

        let msg: ClientMessage = serde_json::from_str(r#"{"message_type":"HI"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Hi { username: None });

        assert!(serde_json::from_str::<ClientMessage>(r#"{"message_type":"READY","text":"x"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"username":"x"}"#).is_err());
    }
}
