//! Session supervisor.
//!
//! Owns the listener and runs sessions back to back: join phase, game,
//! discard, pause, repeat. Ctrl-C stops it between or during sessions.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::data::QuestionBank;
use crate::error::{ServerError, SessionError};

use super::game::{GameSession, GameSettings, GameSummary};
use super::lobby::{JoinSettings, Lobby};
use super::registry::PlayerRegistry;

/// Everything one session needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub join: JoinSettings,
    pub game: GameSettings,
    pub questions_per_game: usize,
}

/// Run the quiz server until interrupted.
pub async fn run(config: ServerConfig, bank: QuestionBank) -> Result<(), ServerError> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::Bind(addr.clone(), e))?;
    info!(%addr, questions = bank.len(), "server listening");

    let settings = config.session_settings();

    loop {
        tokio::select! {
            outcome = run_session(&listener, &settings, &bank) => match outcome {
                Ok(summary) => info!(
                    session = %summary.session_id,
                    rounds = summary.rounds_played,
                    "game finished"
                ),
                Err(SessionError::EmptySession) => {
                    warn!("no players connected, waiting before retrying");
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }

        tokio::select! {
            _ = tokio::time::sleep(config.restart_delay()) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("server stopped");
    Ok(())
}

/// Run one complete session on `listener`.
///
/// Dropping the returned future, or returning, tears down every connection
/// of the session once their queued frames are written.
pub async fn run_session(
    listener: &TcpListener,
    settings: &SessionSettings,
    bank: &QuestionBank,
) -> Result<GameSummary, SessionError> {
    let session_id = Uuid::new_v4();
    let span = info_span!("session", id = %session_id);

    async move {
        let registry = Arc::new(PlayerRegistry::new());
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let mut lobby = Lobby::new(Arc::clone(&registry), inbound_tx, settings.join.clone());
        let players = lobby.gather(listener).await?;
        drop(lobby);

        let questions = {
            let mut rng = rand::thread_rng();
            bank.select(settings.questions_per_game, &mut rng)
        };
        info!(players, questions = questions.len(), "game starting");

        let game = GameSession::new(
            session_id,
            registry,
            inbound_rx,
            questions,
            settings.game.clone(),
        );
        Ok::<_, SessionError>(game.run().await)
    }
    .instrument(span)
    .await
}
