//! The game loop of one session.
//!
//! Each question is broadcast, answers are collected until everyone still
//! connected has answered or the deadline passes, then every player gets a
//! RESULT and everyone gets the leaderboard.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::Question;
use crate::protocol::{ClientMessage, GAME_STARTING_TEXT, LeaderboardEntry, ServerMessage};

use super::connection::{Inbound, InboundReceiver};
use super::leaderboard::rank;
use super::registry::PlayerRegistry;
use super::round::Round;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub seconds_per_question: u64,
    /// Pause after each leaderboard.
    pub between_questions: Duration,
    pub score_for_correct: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            seconds_per_question: 15,
            between_questions: Duration::from_secs(4),
            score_for_correct: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Announcing,
    Broadcasting { qid: u32 },
    Collecting { qid: u32 },
    Scoring { qid: u32 },
    ReportingLeaderboard { qid: u32 },
    Finished,
}

/// Outcome of a completed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub session_id: Uuid,
    pub rounds_played: usize,
    pub standings: Vec<LeaderboardEntry>,
}

pub struct GameSession {
    id: Uuid,
    registry: Arc<PlayerRegistry>,
    inbound: InboundReceiver,
    questions: Vec<Question>,
    settings: GameSettings,
}

impl GameSession {
    pub fn new(
        id: Uuid,
        registry: Arc<PlayerRegistry>,
        inbound: InboundReceiver,
        questions: Vec<Question>,
        settings: GameSettings,
    ) -> Self {
        Self {
            id,
            registry,
            inbound,
            questions,
            settings,
        }
    }

    /// Play every question, then announce the final standings.
    pub async fn run(mut self) -> GameSummary {
        self.enter(Phase::Announcing);
        self.registry
            .broadcast(&ServerMessage::ready(GAME_STARTING_TEXT))
            .await;

        let questions = std::mem::take(&mut self.questions);
        for question in &questions {
            self.play_round(question).await;
            sleep(self.settings.between_questions).await;
        }

        self.enter(Phase::Finished);
        let standings = self.standings().await;
        self.registry
            .broadcast(&ServerMessage::Leaderboard {
                players: standings.clone(),
            })
            .await;
        self.registry.broadcast(&ServerMessage::finished()).await;

        for (place, entry) in standings.iter().enumerate() {
            info!(place = place + 1, username = %entry.username, score = entry.score, "final standing");
        }

        GameSummary {
            session_id: self.id,
            rounds_played: questions.len(),
            standings,
        }
    }

    async fn play_round(&mut self, question: &Question) {
        self.enter(Phase::Broadcasting { qid: question.id });
        let delivered = self
            .registry
            .broadcast(&question.to_message(self.settings.seconds_per_question))
            .await;
        info!(qid = question.id, prompt = %question.prompt, delivered, "question sent");

        self.enter(Phase::Collecting { qid: question.id });
        let round = self.collect_answers(question.id).await;

        self.enter(Phase::Scoring { qid: question.id });
        self.score(question, &round).await;

        self.enter(Phase::ReportingLeaderboard { qid: question.id });
        let players = self.standings().await;
        self.registry
            .broadcast(&ServerMessage::Leaderboard { players })
            .await;
    }

    /// Wait for answers until every responsive player has answered or the
    /// round deadline passes.
    async fn collect_answers(&mut self, qid: u32) -> Round {
        let time_allowed = Duration::from_secs(self.settings.seconds_per_question);
        let mut round = Round::new(qid, Instant::now() + time_allowed);

        loop {
            let waiting_on = self.registry.responsive_ids().await;
            if round.has_answers_from(&waiting_on) {
                debug!(qid, answered = round.answered(), "everyone answered");
                break;
            }

            tokio::select! {
                _ = sleep_until(round.deadline()) => {
                    debug!(qid, answered = round.answered(), "round deadline passed");
                    break;
                }
                event = self.inbound.recv() => match event {
                    Some(Inbound::Message { player, message: ClientMessage::Answer { qid: for_qid, answer } }) => {
                        if round.record(player, for_qid, &answer) {
                            debug!(%player, qid, "answer recorded");
                        } else {
                            debug!(%player, qid = for_qid, "answer ignored");
                        }
                    }
                    Some(Inbound::Message { player, .. }) => {
                        debug!(%player, "unexpected message during round");
                    }
                    Some(Inbound::Closed { player }) => {
                        debug!(%player, "player left during round");
                    }
                    None => {
                        // Every reader is gone, nothing more can arrive.
                        break;
                    }
                },
            }
        }

        round
    }

    /// Award points and send every player their own RESULT.
    async fn score(&self, question: &Question, round: &Round) {
        for player in self.registry.ids().await {
            let given = round.answer_of(&player);
            let correct = question.is_correct(given);
            let reward = if correct { self.settings.score_for_correct } else { 0 };

            let Some(score) = self.registry.add_score(&player, reward).await else {
                continue;
            };
            self.registry
                .send_to(
                    &player,
                    ServerMessage::Result {
                        correct,
                        answer: given.to_string(),
                        correct_answer: question.correct_answer.clone(),
                        score,
                    },
                )
                .await;
        }
    }

    async fn standings(&self) -> Vec<LeaderboardEntry> {
        rank(self.registry.snapshot().await)
    }

    fn enter(&self, phase: Phase) {
        debug!(session = %self.id, ?phase, "entering phase");
    }
}
