//! Host configuration loaded from TOML with CLI overrides.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use ox_quiz::{EliminationMode, GameSettings, SetupViolation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Game and timer configuration for the host.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Participants at game start.
    #[serde(default = "default_total_participants")]
    total_participants: u32,

    /// Survivors that end the game.
    #[serde(default = "default_final_participants")]
    final_participants: u32,

    /// Which respondents leave after each round.
    #[serde(default)]
    elimination_mode: EliminationMode,

    /// Seconds shown before each question.
    #[serde(default = "default_countdown_secs")]
    countdown_secs: u64,

    /// Seconds a participant has to answer.
    #[serde(default = "default_answer_secs")]
    answer_secs: u64,

    /// Question file loaded at startup.
    #[serde(default)]
    questions: Option<PathBuf>,

    /// Where the terminal UI writes its log.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_total_participants() -> u32 {
    10
}

fn default_final_participants() -> u32 {
    3
}

fn default_countdown_secs() -> u64 {
    3
}

fn default_answer_secs() -> u64 {
    5
}

fn default_log_file() -> PathBuf {
    PathBuf::from("ox_survival.log")
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            total_participants: default_total_participants(),
            final_participants: default_final_participants(),
            elimination_mode: EliminationMode::default(),
            countdown_secs: default_countdown_secs(),
            answer_secs: default_answer_secs(),
            questions: None,
            log_file: default_log_file(),
        }
    }
}

/// Values given on the command line that win over the file.
#[derive(Debug, Clone, Default, PartialEq, new)]
pub struct ConfigOverrides {
    /// `--participants`
    pub total_participants: Option<u32>,
    /// `--final`
    pub final_participants: Option<u32>,
    /// `--mode`
    pub elimination_mode: Option<EliminationMode>,
    /// `--questions`
    pub questions: Option<PathBuf>,
}

impl QuizConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if config.countdown_secs == 0 || config.answer_secs == 0 {
            return Err(ConfigError::new(
                "Timer durations must be at least one second".to_string(),
            ));
        }

        info!(
            total = config.total_participants,
            target = config.final_participants,
            mode = %config.elimination_mode,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads the file when it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line values on top of this configuration.
    #[instrument(skip(self))]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(total) = overrides.total_participants {
            self.total_participants = total;
        }
        if let Some(target) = overrides.final_participants {
            self.final_participants = target;
        }
        if let Some(mode) = overrides.elimination_mode {
            self.elimination_mode = mode;
        }
        if overrides.questions.is_some() {
            self.questions = overrides.questions;
        }
        self
    }

    /// Validated game settings built from this configuration.
    pub fn settings(&self) -> Result<GameSettings, SetupViolation> {
        GameSettings::new(
            self.total_participants,
            self.final_participants,
            self.elimination_mode,
        )
    }

    /// Pre-question countdown length.
    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }

    /// Answer window length.
    pub fn answer_time(&self) -> Duration {
        Duration::from_secs(self.answer_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
