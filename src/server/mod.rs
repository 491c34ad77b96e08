//! Quiz server module.
//!
//! Provides the TCP multiplayer quiz host: player registry, join phase,
//! game loop and the session supervisor around them.

mod connection;
mod game;
mod leaderboard;
mod lobby;
mod registry;
mod round;
mod server;

pub use connection::{Inbound, InboundReceiver, InboundSender, admit, display_name};
pub use game::{GameSession, GameSettings, GameSummary, Phase};
pub use leaderboard::rank;
pub use lobby::{JoinSettings, JoinStage, Lobby};
pub use registry::{PlayerRegistry, Seat};
pub use round::Round;
pub use server::{SessionSettings, run, run_session};
