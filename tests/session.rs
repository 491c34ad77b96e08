use std::time::Duration;

use rust_trivia::protocol::{
    ClientMessage, FrameReader, FrameWriter, GAME_STARTING_TEXT, LeaderboardEntry, ServerMessage,
    welcome_text,
};
use rust_trivia::server::{GameSettings, JoinSettings, SessionSettings, run_session};
use rust_trivia::{QuestionBank, QuestionTemplate, SessionError};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

struct TestPlayer {
    reader: FrameReader<OwnedReadHalf>,
    writer: FrameWriter<OwnedWriteHalf>,
}

impl TestPlayer {
    async fn join(port: u16, name: &str) -> Self {
        let stream = tokio::net::TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        let mut player = Self {
            reader: FrameReader::new(read_half),
            writer: FrameWriter::new(write_half),
        };
        player
            .writer
            .send(&ClientMessage::Hi {
                username: Some(name.to_string()),
            })
            .await
            .unwrap();
        player
    }

    async fn expect(&mut self) -> ServerMessage {
        tokio::time::timeout(Duration::from_secs(10), self.reader.next::<ServerMessage>())
            .await
            .expect("timed out waiting for server")
            .unwrap()
            .expect("server closed the connection")
    }

    async fn answer(&mut self, qid: u32, answer: &str) {
        self.writer
            .send(&ClientMessage::Answer {
                qid,
                answer: answer.to_string(),
            })
            .await
            .unwrap();
    }
}

fn settings(min_players: usize) -> SessionSettings {
    SessionSettings {
        join: JoinSettings {
            min_players,
            join_wait: Duration::from_secs(5),
            handshake_timeout: Duration::from_secs(2),
        },
        game: GameSettings {
            seconds_per_question: 5,
            between_questions: Duration::ZERO,
            score_for_correct: 1,
        },
        questions_per_game: 1,
    }
}

fn single_question_bank() -> QuestionBank {
    QuestionBank::new(vec![QuestionTemplate::new(
        "5 + 7 = ?",
        &["11", "12", "13", "14"],
        "12",
    )])
    .unwrap()
}

#[tokio::test]
async fn test_full_session_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let bank = single_question_bank();

    let players = tokio::spawn(async move {
        let mut alice = TestPlayer::join(port, "alice").await;
        assert_eq!(alice.expect().await, ServerMessage::ready(welcome_text("alice")));

        let mut bob = TestPlayer::join(port, "bob").await;
        assert_eq!(bob.expect().await, ServerMessage::ready(welcome_text("bob")));

        for player in [&mut alice, &mut bob] {
            assert_eq!(player.expect().await, ServerMessage::ready(GAME_STARTING_TEXT));
            match player.expect().await {
                ServerMessage::Question {
                    qid,
                    question,
                    choices,
                    time_allowed,
                } => {
                    assert_eq!(qid, 1);
                    assert_eq!(question, "5 + 7 = ?");
                    assert_eq!(choices.len(), 4);
                    assert_eq!(time_allowed, 5);
                }
                other => panic!("expected a question, got {:?}", other),
            }
        }

        alice.answer(1, "12").await;
        bob.answer(1, "13").await;

        assert_eq!(
            alice.expect().await,
            ServerMessage::Result {
                correct: true,
                answer: "12".into(),
                correct_answer: "12".into(),
                score: 1,
            }
        );
        assert_eq!(
            bob.expect().await,
            ServerMessage::Result {
                correct: false,
                answer: "13".into(),
                correct_answer: "12".into(),
                score: 0,
            }
        );

        let board = vec![LeaderboardEntry::new("alice", 1), LeaderboardEntry::new("bob", 0)];
        for player in [&mut alice, &mut bob] {
            assert_eq!(
                player.expect().await,
                ServerMessage::Leaderboard {
                    players: board.clone()
                }
            );
            assert_eq!(
                player.expect().await,
                ServerMessage::Leaderboard {
                    players: board.clone()
                }
            );
            assert_eq!(player.expect().await, ServerMessage::finished());
        }

        let closed = alice.reader.next::<ServerMessage>().await.unwrap();
        assert!(closed.is_none());
    });

    let summary = run_session(&listener, &settings(2), &bank).await.unwrap();
    assert_eq!(summary.rounds_played, 1);
    assert_eq!(
        summary.standings,
        vec![LeaderboardEntry::new("alice", 1), LeaderboardEntry::new("bob", 0)]
    );

    players.await.unwrap();
}

#[tokio::test]
async fn test_empty_session_sends_nothing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut settings = settings(2);
    settings.join.join_wait = Duration::from_millis(200);

    let outcome = run_session(&listener, &settings, &single_question_bank()).await;
    assert_eq!(outcome.unwrap_err(), SessionError::EmptySession);
}
