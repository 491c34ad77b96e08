//! Server configuration.
//!
//! Values come from built-in defaults, then an optional JSON file, then the
//! `PORT` environment variable. Command line flags are applied last by the
//! binary.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::protocol::DEFAULT_PORT;
use crate::server::{GameSettings, JoinSettings, SessionSettings};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "server_config.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub min_players: usize,
    pub max_wait_seconds_for_players: u64,
    pub questions_per_game: usize,
    pub seconds_per_question: u64,
    pub seconds_between_questions: u64,
    pub score_for_correct: u32,
    pub handshake_timeout_seconds: u64,
    pub restart_delay_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            min_players: 2,
            max_wait_seconds_for_players: 30,
            questions_per_game: 5,
            seconds_per_question: 15,
            seconds_between_questions: 4,
            score_for_correct: 1,
            handshake_timeout_seconds: 10,
            restart_delay_seconds: 5,
        }
    }
}

impl ServerConfig {
    /// Load the config, falling back to [`DEFAULT_CONFIG_PATH`] when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        if let Ok(port) = std::env::var("PORT") {
            config.apply_port_override(&port)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_json(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn apply_port_override(&mut self, value: &str) -> Result<(), ConfigError> {
        self.port = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Port(value.to_string()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players == 0 {
            return Err(ConfigError::Invalid("min_players must be at least 1"));
        }
        if self.questions_per_game == 0 {
            return Err(ConfigError::Invalid("questions_per_game must be at least 1"));
        }
        if self.seconds_per_question == 0 {
            return Err(ConfigError::Invalid("seconds_per_question must be at least 1"));
        }
        if self.score_for_correct == 0 {
            return Err(ConfigError::Invalid("score_for_correct must be at least 1"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_seconds)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            join: JoinSettings {
                min_players: self.min_players,
                join_wait: Duration::from_secs(self.max_wait_seconds_for_players),
                handshake_timeout: Duration::from_secs(self.handshake_timeout_seconds),
            },
            game: GameSettings {
                seconds_per_question: self.seconds_per_question,
                between_questions: Duration::from_secs(self.seconds_between_questions),
                score_for_correct: self.score_for_correct,
            },
            questions_per_game: self.questions_per_game,
        }
    }
}
