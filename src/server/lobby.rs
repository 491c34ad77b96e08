//! Join phase: accept connections until quorum or timeout.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::error::SessionError;

use super::connection::{InboundSender, admit};
use super::registry::PlayerRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSettings {
    /// Players needed to start before `join_wait` runs out.
    pub min_players: usize,
    pub join_wait: Duration,
    pub handshake_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStage {
    AcceptingConnections,
    QuorumReached,
}

pub struct Lobby {
    registry: Arc<PlayerRegistry>,
    inbound: InboundSender,
    settings: JoinSettings,
    stage: JoinStage,
}

impl Lobby {
    pub fn new(registry: Arc<PlayerRegistry>, inbound: InboundSender, settings: JoinSettings) -> Self {
        Self {
            registry,
            inbound,
            settings,
            stage: JoinStage::AcceptingConnections,
        }
    }

    pub fn stage(&self) -> JoinStage {
        self.stage
    }

    /// Accept players until `min_players` have joined or `join_wait` elapses,
    /// then close registration. Returns the number of players, or
    /// [`SessionError::EmptySession`] when nobody joined.
    pub async fn gather(&mut self, listener: &TcpListener) -> Result<usize, SessionError> {
        let deadline = Instant::now() + self.settings.join_wait;
        let mut count = self.registry.subscribe();
        let min_players = self.settings.min_players;

        info!(
            min_players,
            wait_secs = self.settings.join_wait.as_secs(),
            "waiting for players"
        );

        while self.stage == JoinStage::AcceptingConnections {
            tokio::select! {
                biased;
                _ = count.wait_for(|n| *n >= min_players) => {
                    debug!("quorum reached");
                    self.stage = JoinStage::QuorumReached;
                }
                _ = sleep_until(deadline) => {
                    debug!("join wait elapsed");
                    self.stage = JoinStage::QuorumReached;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        debug!(%addr, "connection accepted");
                        let registry = Arc::clone(&self.registry);
                        let inbound = self.inbound.clone();
                        let timeout = self.settings.handshake_timeout;
                        tokio::spawn(async move {
                            if let Err(e) = admit(stream, addr, registry, inbound, timeout).await {
                                debug!(%addr, error = %e, "connection discarded");
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "failed to accept connection"),
                },
            }
        }

        self.registry.close().await;

        let players = self.registry.len().await;
        if players == 0 {
            return Err(SessionError::EmptySession);
        }
        Ok(players)
    }
}
