//! # rust-trivia
//!
//! A multiplayer trivia quiz over a line-delimited JSON TCP protocol.
//!
//! The server waits for a quorum of players, broadcasts questions, collects
//! timed answers, scores them and reports running and final leaderboards.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rust_trivia::{QuestionBank, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::load(None)?;
//!     rust_trivia::server::run(config, QuestionBank::builtin()).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod server;

pub use config::ServerConfig;
pub use data::{QuestionBank, load_questions_from_json};
pub use error::{CodecError, ConfigError, JoinError, LoadError, RegistryError, ServerError, SessionError};
pub use models::{PlayerId, Question, QuestionTemplate};
