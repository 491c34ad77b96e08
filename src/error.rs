//! Error types for the quiz server and client.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::PlayerId;

/// Framing errors on a single connection.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("connection I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("frame longer than {0} bytes")]
    Oversized(usize),
}

impl CodecError {
    /// The frame was bad but the connection is still usable.
    pub fn is_decode_failure(&self) -> bool {
        !matches!(self, CodecError::Io(_))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("player {0} is already registered")]
    DuplicateIdentity(PlayerId),

    #[error("registration is closed for this session")]
    Closed,
}

/// Why an accepted connection did not become a player.
#[derive(Debug, Error)]
pub enum JoinError {
    #[error("missing or malformed handshake")]
    MalformedHandshake,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no players joined before the join phase ended")]
    EmptySession,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(PathBuf, io::Error),

    #[error("failed to parse config {0}: {1}")]
    Parse(PathBuf, serde_json::Error),

    #[error("invalid PORT value {0:?}")]
    Port(String),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Errors loading a question file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, io::Error),

    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, serde_json::Error),

    #[error("question {index} is invalid: {reason}")]
    Invalid { index: usize, reason: &'static str },

    #[error("question bank must contain at least one question")]
    Empty,
}

/// Fatal errors of the server process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {0}: {1}")]
    Bind(String, io::Error),
}
